//! Style resolution: colors, alignment, padding, and frames

pub mod palette;
pub mod resolve;

pub use palette::{
    contrasting, neutral_color, resolve_color, with_opacity, Rgb, Theme, ThemeCatalog, DEFAULT_THEME_ID,
    NEUTRAL_COLORS,
};
pub use resolve::{
    frame_width, resolve_element_align, resolve_text_align, resolve_vertical_align,
    CellAlignment, CellAlignments, Frame, FrameSpec, Padding, ResolvedFrame,
};
