//! Configuration for layout editing

/// Limits applied when sections and subdivisions are resized or added
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Smallest share any section or subdivision may take, in percent
    pub min_size: f64,

    /// Largest share any section or subdivision may take, in percent
    ///
    /// Further capped per sibling group so every sibling keeps `min_size`.
    pub max_size: f64,

    /// Allowed deviation of a sibling group's sum from 100
    pub tolerance: f64,

    /// Maximum number of top-level sections
    pub max_sections: usize,

    /// Maximum number of subdivisions inside one section
    pub max_subdivisions: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_size: 10.0,
            max_size: 90.0,
            tolerance: 0.1,
            max_sections: 6,
            max_subdivisions: 3,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum sibling share
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum sibling share
    pub fn with_max_size(mut self, max_size: f64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the maximum number of sections
    pub fn with_max_sections(mut self, max_sections: usize) -> Self {
        self.max_sections = max_sections;
        self
    }

    /// Upper bound for one member of a group of `siblings` entries
    pub fn dynamic_max(&self, siblings: usize) -> f64 {
        let reserved = siblings.saturating_sub(1) as f64 * self.min_size;
        self.max_size.min(100.0 - reserved)
    }
}
