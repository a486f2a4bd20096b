//! Value types owned by a document: the image pool, text layers, fonts, logo

use std::fmt;

use serde::Deserialize;

use crate::layout::TextAlign;
use crate::overlay::OverlaySettings;

/// How an image fills its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ImageFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            ImageFit::Fill => "fill",
        }
    }
}

/// Focal point of an image in percent of its own size
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl Default for FocalPoint {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Per-image color and blur filters; each is independent
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageFilters {
    pub grayscale: bool,
    pub sepia: bool,
    /// Blur radius in pixels
    pub blur: f64,
    /// Contrast in percent, 100 is unchanged
    pub contrast: f64,
    /// Brightness in percent, 100 is unchanged
    pub brightness: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            grayscale: false,
            sepia: false,
            blur: 0.0,
            contrast: 100.0,
            brightness: 100.0,
        }
    }
}

/// An image in the pool; cells reference it by id
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePoolEntry {
    pub id: String,
    pub src: String,
    pub name: String,
    pub fit: ImageFit,
    pub position: FocalPoint,
    pub filters: ImageFilters,
    pub overlay: OverlaySettings,
}

impl ImagePoolEntry {
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            src: src.into(),
            fit: ImageFit::default(),
            position: FocalPoint::default(),
            filters: ImageFilters::default(),
            overlay: OverlaySettings::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_overlay(mut self, overlay: OverlaySettings) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_filters(mut self, filters: ImageFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// The six fixed text layers, in stacking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextKind {
    Title,
    Tagline,
    BodyHeading,
    BodyText,
    Cta,
    Footnote,
}

impl TextKind {
    pub const ALL: [TextKind; 6] = [
        TextKind::Title,
        TextKind::Tagline,
        TextKind::BodyHeading,
        TextKind::BodyText,
        TextKind::Cta,
        TextKind::Footnote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextKind::Title => "title",
            TextKind::Tagline => "tagline",
            TextKind::BodyHeading => "body_heading",
            TextKind::BodyText => "body_text",
            TextKind::Cta => "cta",
            TextKind::Footnote => "footnote",
        }
    }

    /// Parse a layer id; accepts both `body_heading` and `bodyHeading` spellings
    pub fn from_id(id: &str) -> Option<TextKind> {
        match id {
            "title" => Some(TextKind::Title),
            "tagline" => Some(TextKind::Tagline),
            "body_heading" | "bodyHeading" => Some(TextKind::BodyHeading),
            "body_text" | "bodyText" => Some(TextKind::BodyText),
            "cta" => Some(TextKind::Cta),
            "footnote" => Some(TextKind::Footnote),
            _ => None,
        }
    }

    /// Whether this layer is set in the heading font
    pub fn uses_heading_font(&self) -> bool {
        matches!(
            self,
            TextKind::Title | TextKind::Tagline | TextKind::BodyHeading | TextKind::Cta
        )
    }

    /// Font size in pixels on a 1080px reference canvas
    pub fn default_size(&self) -> f64 {
        match self {
            TextKind::Title => 72.0,
            TextKind::Tagline => 36.0,
            TextKind::BodyHeading => 40.0,
            TextKind::BodyText => 24.0,
            TextKind::Cta => 28.0,
            TextKind::Footnote => 16.0,
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One text layer's content and styling
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub content: String,
    pub visible: bool,
    /// Color reference; `None` uses the placement's default color
    pub color: Option<String>,
    /// Font size in pixels on a 1080px reference canvas; `None` uses the kind's default
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    /// Letter spacing in em
    pub letter_spacing: f64,
    /// `None` inherits from the cell, then the layout
    pub text_align: Option<TextAlign>,
}

impl TextLayer {
    /// A visible layer with default styling
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            visible: true,
            color: None,
            size: None,
            bold: false,
            italic: false,
            letter_spacing: 0.0,
            text_align: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Visible with non-blank content
    pub fn renders(&self) -> bool {
        self.visible && !self.content.trim().is_empty()
    }
}

/// Font families for headings and body copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fonts {
    pub heading: String,
    pub body: String,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            heading: "Inter".to_string(),
            body: "Inter".to_string(),
        }
    }
}

/// Where the logo sits on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl LogoPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoPosition::TopLeft => "top-left",
            LogoPosition::TopRight => "top-right",
            LogoPosition::BottomLeft => "bottom-left",
            LogoPosition::BottomRight => "bottom-right",
            LogoPosition::Center => "center",
        }
    }
}

/// A logo image placed over the whole composition
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub src: String,
    pub position: LogoPosition,
    /// Edge length in percent of the canvas's shorter side
    pub size: f64,
}

impl Logo {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            position: LogoPosition::default(),
            size: 12.0,
        }
    }
}
