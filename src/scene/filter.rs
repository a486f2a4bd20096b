//! CSS filter chains for cell images

use std::fmt;

use crate::document::ImageFilters;

/// Concrete filter values for one rendered image
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    pub grayscale: bool,
    pub sepia: bool,
    /// Percent, 100 is neutral
    pub contrast: f64,
    /// Percent, 100 is neutral
    pub brightness: f64,
    /// Pixels, 0 is neutral
    pub blur: f64,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self {
            grayscale: false,
            sepia: false,
            contrast: 100.0,
            brightness: 100.0,
            blur: 0.0,
        }
    }
}

impl FilterChain {
    /// Build the chain for an image's filters
    ///
    /// `force_grayscale` is set when an overlay (duotone) needs a gray base.
    pub fn from_filters(filters: &ImageFilters, force_grayscale: bool) -> Self {
        Self {
            grayscale: filters.grayscale || force_grayscale,
            sepia: filters.sepia,
            contrast: filters.contrast.max(0.0),
            brightness: filters.brightness.max(0.0),
            blur: filters.blur.max(0.0),
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == FilterChain::default()
    }

    /// The CSS `filter` value, or `None` when nothing applies
    pub fn expression(&self) -> Option<String> {
        if self.is_neutral() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.grayscale {
            parts.push("grayscale(100%)".to_string());
        }
        if self.sepia {
            parts.push("sepia(100%)".to_string());
        }
        if self.contrast != 100.0 {
            parts.push(format!("contrast({}%)", self.contrast));
        }
        if self.brightness != 100.0 {
            parts.push(format!("brightness({}%)", self.brightness));
        }
        if self.blur > 0.0 {
            parts.push(format!("blur({}px)", self.blur));
        }
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}
