//! Text runs and their stacking inside a cell's content box
//!
//! Text measurement here is an estimate from character counts, good enough
//! to stack runs and to report overflow; renderers do the real shaping.

use crate::document::TextKind;
use crate::layout::{BoundingBox, TextAlign, VerticalAlign};
use crate::platform::Dimensions;

/// Canvas side length the per-kind font sizes are designed for
pub const REFERENCE_SIDE: f64 = 1080.0;

/// Average glyph advance in em
pub const GLYPH_WIDTH_EM: f64 = 0.6;

pub const LINE_HEIGHT: f64 = 1.2;

/// Gap between consecutive runs in em of the following run
pub const RUN_GAP_EM: f64 = 0.5;

/// Largest font size accepted, in px at the reference side
pub const MAX_FONT_SIZE: f64 = 1000.0;

/// Letter spacing bounds in em
pub const MIN_LETTER_SPACING_EM: f64 = -GLYPH_WIDTH_EM;
pub const MAX_LETTER_SPACING_EM: f64 = 5.0;

/// Upper bound for the wrapped line count of one run
pub const MAX_LINES: usize = 10_000;

/// Drop shadow applied to text drawn over an image
#[derive(Debug, Clone, PartialEq)]
pub struct TextShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
}

impl TextShadow {
    pub fn on_image() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 2.0,
            blur: 8.0,
            color: "rgba(0, 0, 0, 0.50)".to_string(),
        }
    }

    /// CSS `text-shadow` value
    pub fn css(&self) -> String {
        format!(
            "{}px {}px {}px {}",
            self.offset_x, self.offset_y, self.blur, self.color
        )
    }
}

/// A fully styled, positioned text layer
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub kind: TextKind,
    pub content: String,
    pub font_family: String,
    /// Pixels on the actual canvas
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    /// Letter spacing in em
    pub letter_spacing: f64,
    pub align: TextAlign,
    pub vertical_align: VerticalAlign,
    /// Estimated wrapped line count
    pub lines: usize,
    pub bounds: BoundingBox,
    pub shadow: Option<TextShadow>,
}

impl TextRun {
    /// Estimated height of the run's block
    pub fn block_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT * self.lines as f64
    }
}

/// Factor from reference font sizes to the canvas
pub fn font_scale(dimensions: &Dimensions) -> f64 {
    dimensions.short_side() as f64 / REFERENCE_SIDE
}

/// Font size in px at the reference side, kept finite and in `1..=MAX_FONT_SIZE`
pub fn sanitize_font_size(size: Option<f64>, default: f64) -> f64 {
    size.filter(|s| s.is_finite())
        .unwrap_or(default)
        .clamp(1.0, MAX_FONT_SIZE)
}

pub fn sanitize_letter_spacing(spacing: f64) -> f64 {
    if spacing.is_finite() {
        spacing.clamp(MIN_LETTER_SPACING_EM, MAX_LETTER_SPACING_EM)
    } else {
        0.0
    }
}

/// Estimated single-line width of `content`
pub fn estimate_width(content: &str, font_size: f64, letter_spacing: f64) -> f64 {
    content.chars().count() as f64 * font_size * (GLYPH_WIDTH_EM + letter_spacing).max(0.0)
}

/// Estimated line count after wrapping to `available_width`
///
/// Explicit line breaks are honored; every line counts at least once. The
/// total never exceeds [`MAX_LINES`].
pub fn estimate_lines(
    content: &str,
    font_size: f64,
    letter_spacing: f64,
    available_width: f64,
) -> usize {
    content
        .lines()
        .map(|line| {
            let width = estimate_width(line, font_size, letter_spacing);
            if available_width <= 0.0 || width.is_nan() || width <= available_width {
                1
            } else {
                (width / available_width).ceil().min(MAX_LINES as f64) as usize
            }
        })
        .fold(0usize, |total, lines| total.saturating_add(lines))
        .clamp(1, MAX_LINES)
}

/// Total height of stacked runs, gaps included
pub fn stack_height(runs: &[TextRun]) -> f64 {
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let gap = if i == 0 { 0.0 } else { run.font_size * RUN_GAP_EM };
            gap + run.block_height()
        })
        .sum()
}

/// Position runs as one vertical block inside `content_box`
///
/// Runs keep their order, span the full content width, and the block is
/// placed at the start, center or end of the box. A block taller than the
/// box overflows past its bottom edge.
pub fn stack_runs(runs: &mut [TextRun], content_box: BoundingBox, vertical: VerticalAlign) {
    let total = stack_height(runs);
    let mut y = match vertical {
        VerticalAlign::Start => content_box.y,
        VerticalAlign::Center => content_box.y + ((content_box.height - total) / 2.0).max(0.0),
        VerticalAlign::End => content_box.y + (content_box.height - total).max(0.0),
    };

    for (i, run) in runs.iter_mut().enumerate() {
        if i > 0 {
            y += run.font_size * RUN_GAP_EM;
        }
        let height = run.block_height();
        run.bounds = BoundingBox::new(content_box.x, y, content_box.width, height);
        y += height;
    }
}
