//! Core types for the grid layout

use serde::Deserialize;

/// How the canvas is split along its primary axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// One cell covering the whole canvas
    #[default]
    Fullbleed,
    /// Sections stacked top to bottom, subdivisions split left to right
    Rows,
    /// Sections placed left to right, subdivisions split top to bottom
    Columns,
}

impl LayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Fullbleed => "fullbleed",
            LayoutType::Rows => "rows",
            LayoutType::Columns => "columns",
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Vertical placement of the text block inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Start,
    #[default]
    Center,
    End,
}

impl VerticalAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlign::Start => "start",
            VerticalAlign::Center => "center",
            VerticalAlign::End => "end",
        }
    }
}

/// One top-level row or column of the layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    /// Share of the primary axis, in percent
    #[serde(default)]
    pub size: f64,
    /// Number of secondary-axis splits (1 to 3)
    #[serde(default = "default_subdivisions")]
    pub subdivisions: usize,
    /// Share of the secondary axis per subdivision, in percent
    #[serde(default)]
    pub sub_sizes: Vec<f64>,
}

fn default_subdivisions() -> usize {
    1
}

impl Section {
    /// A section spanning the whole canvas with a single cell
    pub fn full() -> Self {
        Self::new(100.0, 1)
    }

    /// A section of the given size whose subdivisions share its length equally
    pub fn new(size: f64, subdivisions: usize) -> Self {
        let subdivisions = subdivisions.max(1);
        Self {
            size,
            subdivisions,
            sub_sizes: vec![100.0 / subdivisions as f64; subdivisions],
        }
    }

    /// Set explicit subdivision sizes; the subdivision count follows the list
    pub fn with_sub_sizes(mut self, sub_sizes: Vec<f64>) -> Self {
        self.subdivisions = sub_sizes.len();
        self.sub_sizes = sub_sizes;
        self
    }
}

/// Ordered sections of a layout
pub type Structure = Vec<Section>;

/// A layout: type, structure, and the global text alignment defaults
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub layout_type: LayoutType,
    pub structure: Structure,
    pub text_align: TextAlign,
    pub text_vertical_align: VerticalAlign,
}

impl Layout {
    pub fn fullbleed() -> Self {
        Self::default()
    }

    pub fn rows(structure: Structure) -> Self {
        Self {
            layout_type: LayoutType::Rows,
            structure,
            ..Self::default()
        }
    }

    pub fn columns(structure: Structure) -> Self {
        Self {
            layout_type: LayoutType::Columns,
            structure,
            ..Self::default()
        }
    }

    pub fn with_alignment(mut self, text_align: TextAlign, vertical: VerticalAlign) -> Self {
        self.text_align = text_align;
        self.text_vertical_align = vertical;
        self
    }

    pub fn is_fullbleed(&self) -> bool {
        self.layout_type == LayoutType::Fullbleed
    }
}

/// A rectangle in percent of the whole canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Project onto a canvas of the given pixel dimensions
    pub fn to_pixels(&self, canvas_width: f64, canvas_height: f64) -> BoundingBox {
        BoundingBox::new(
            self.x * canvas_width / 100.0,
            self.y * canvas_height / 100.0,
            self.width * canvas_width / 100.0,
            self.height * canvas_height / 100.0,
        )
    }
}

/// A pixel-space rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shrink by `amount` on every side, never below zero size
    pub fn inset(&self, amount: f64) -> BoundingBox {
        let dx = amount.min(self.width / 2.0).max(0.0);
        let dy = amount.min(self.height / 2.0).max(0.0);
        BoundingBox::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// A resolved, flattened cell of the grid
///
/// Cells are derived from a [`Structure`] and never stored; the index is the
/// traversal order (outer section, then inner subdivision).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub index: usize,
    pub section_index: usize,
    pub sub_index: usize,
    /// Share of the primary axis taken by the owning section
    pub section_size_pct: f64,
    /// Share of the section taken by this subdivision
    pub sub_size_pct: f64,
    /// Placement relative to the whole canvas
    pub rect: PercentRect,
}
