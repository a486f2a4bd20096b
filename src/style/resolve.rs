//! Fallback chains for alignment, padding, and frames
//!
//! Every chain is evaluated per cell with the cell index passed explicitly:
//! element value → cell override → layout-global default.

use std::collections::BTreeMap;

use crate::layout::{Layout, TextAlign, VerticalAlign};

use super::palette::{resolve_color, Theme};

/// Per-cell alignment overrides; unset fields defer to the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellAlignment {
    pub text_align: Option<TextAlign>,
    pub text_vertical_align: Option<VerticalAlign>,
}

/// Alignment overrides keyed by cell index
pub type CellAlignments = BTreeMap<usize, CellAlignment>;

/// Horizontal alignment for a cell: cell override, then layout default
pub fn resolve_text_align(cell: usize, overrides: &CellAlignments, layout: &Layout) -> TextAlign {
    overrides
        .get(&cell)
        .and_then(|a| a.text_align)
        .unwrap_or(layout.text_align)
}

/// Vertical alignment for a cell: cell override, then layout default
pub fn resolve_vertical_align(
    cell: usize,
    overrides: &CellAlignments,
    layout: &Layout,
) -> VerticalAlign {
    overrides
        .get(&cell)
        .and_then(|a| a.text_vertical_align)
        .unwrap_or(layout.text_vertical_align)
}

/// Horizontal alignment for one text element: element, cell, then layout
pub fn resolve_element_align(
    element: Option<TextAlign>,
    cell: usize,
    overrides: &CellAlignments,
    layout: &Layout,
) -> TextAlign {
    element.unwrap_or_else(|| resolve_text_align(cell, overrides, layout))
}

/// Padding in pixels, global with per-cell overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Padding {
    pub global: f64,
    pub cells: BTreeMap<usize, f64>,
}

impl Padding {
    pub fn new(global: f64) -> Self {
        Self {
            global,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, cell: usize, value: f64) -> Self {
        self.cells.insert(cell, value);
        self
    }

    /// Padding for a cell: its override, or the global value
    pub fn resolve(&self, cell: usize) -> f64 {
        self.cells.get(&cell).copied().unwrap_or(self.global).max(0.0)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(40.0)
    }
}

/// A frame setting: width as a percentage of the resolved padding, and a color key
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub percent: f64,
    pub color: String,
}

impl FrameSpec {
    pub fn new(percent: f64, color: impl Into<String>) -> Self {
        Self {
            percent,
            color: color.into(),
        }
    }
}

/// The outer canvas frame and per-cell frames
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub outer: Option<FrameSpec>,
    pub cells: BTreeMap<usize, FrameSpec>,
}

/// A frame with its pixel width and concrete color
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrame {
    pub width: u32,
    pub color: String,
}

/// Frame width in pixels, derived from an already-resolved padding value
pub fn frame_width(padding: f64, percent: f64) -> u32 {
    (padding.max(0.0) * percent.clamp(0.0, 100.0) / 100.0).round() as u32
}

const FRAME_FALLBACK_COLOR: &str = "#ffffff";

fn resolve_frame_spec(spec: &FrameSpec, padding: f64, theme: &Theme) -> Option<ResolvedFrame> {
    let width = frame_width(padding, spec.percent);
    if width == 0 {
        return None;
    }
    Some(ResolvedFrame {
        width,
        color: resolve_color(&spec.color, theme, FRAME_FALLBACK_COLOR),
    })
}

impl Frame {
    /// The outer frame, sized from the global padding
    pub fn resolve_outer(&self, padding: &Padding, theme: &Theme) -> Option<ResolvedFrame> {
        self.outer
            .as_ref()
            .and_then(|spec| resolve_frame_spec(spec, padding.global.max(0.0), theme))
    }

    /// A cell's frame, sized from that cell's resolved padding
    pub fn resolve_cell(&self, cell: usize, padding: &Padding, theme: &Theme) -> Option<ResolvedFrame> {
        self.cells
            .get(&cell)
            .and_then(|spec| resolve_frame_spec(spec, padding.resolve(cell), theme))
    }
}
