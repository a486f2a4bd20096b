//! Error types for layout editing

use thiserror::Error;

/// Edits that cannot be applied to a structure
///
/// Out-of-range sizes are never errors; they are clamped. These variants
/// cover edits that address something that does not exist or would leave
/// the layout without cells.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// Section index beyond the structure
    #[error("section {index} does not exist (layout has {count} sections)")]
    SectionOutOfRange { index: usize, count: usize },

    /// Subdivision index beyond the section
    #[error("subdivision {sub_index} does not exist in section {section} ({count} subdivisions)")]
    SubdivisionOutOfRange {
        section: usize,
        sub_index: usize,
        count: usize,
    },

    /// The last remaining section cannot be removed
    #[error("cannot remove the only section of a layout")]
    LastSection,

    /// Adding a section would exceed the configured maximum
    #[error("layout already has the maximum of {max} sections")]
    TooManySections { max: usize },

    /// Fullbleed layouts have a fixed single-cell structure
    #[error("fullbleed layouts cannot be {action}")]
    FullbleedStructure { action: &'static str },
}

impl LayoutError {
    pub fn section_out_of_range(index: usize, count: usize) -> Self {
        Self::SectionOutOfRange { index, count }
    }

    pub fn subdivision_out_of_range(section: usize, sub_index: usize, count: usize) -> Self {
        Self::SubdivisionOutOfRange {
            section,
            sub_index,
            count,
        }
    }
}
