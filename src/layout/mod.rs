//! Grid layout: structure, cell geometry, and size editing
//!
//! A [`Layout`] is a list of sections along a primary axis, each split into
//! subdivisions along the secondary axis. [`resolve_cells`] flattens it into
//! the ordered [`Cell`] list every other resolver indexes into.

pub mod config;
pub mod error;
pub mod geometry;
pub mod resize;
pub mod types;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use geometry::{
    cell_count, cell_count_with_config, normalize_layout, normalize_structure, resolve_cells,
    resolve_cells_with_config,
};
pub use types::*;
