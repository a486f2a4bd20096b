//! The render-ready scene
//!
//! A [`Scene`] is the fully resolved description of one composition: pixel
//! geometry, concrete colors, overlay stacks, filter chains and positioned
//! text runs for every cell. Renderers consume it without looking back at
//! the document.

mod builder;
mod describe;
pub mod filter;
pub mod text;

pub use builder::{build_scene, place_logo};
pub use filter::FilterChain;
pub use text::{TextRun, TextShadow};

use crate::document::{FocalPoint, ImageFit, LogoPosition, TextKind};
use crate::layout::{BoundingBox, Cell, TextAlign, VerticalAlign};
use crate::overlay::OverlayLayer;
use crate::style::ResolvedFrame;

/// A resolved composition
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub outer_frame: Option<ResolvedFrame>,
    pub cells: Vec<SceneCell>,
    pub logo: Option<LogoPlacement>,
}

impl Scene {
    pub fn cell(&self, index: usize) -> Option<&SceneCell> {
        self.cells.get(index)
    }

    /// The rendered run of a text layer and the cell it sits in
    pub fn find_text(&self, kind: TextKind) -> Option<(&SceneCell, &TextRun)> {
        self.cells.iter().find_map(|cell| {
            cell.text_runs()
                .find(|run| run.kind == kind)
                .map(|run| (cell, run))
        })
    }

    /// Every rendered text run, cell by cell
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.cells.iter().flat_map(|cell| cell.text_runs())
    }
}

/// One cell of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCell {
    pub cell: Cell,
    /// Pixel rectangle of the cell on the canvas
    pub bounds: BoundingBox,
    /// `bounds` inset by the resolved padding
    pub content_box: BoundingBox,
    pub padding: f64,
    pub background: String,
    pub image: Option<SceneImage>,
    /// Overlay layers, bottom first
    pub overlays: Vec<OverlayLayer>,
    pub frame: Option<ResolvedFrame>,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub on_image_text: Vec<TextRun>,
    pub background_text: Vec<TextRun>,
}

impl SceneCell {
    pub fn index(&self) -> usize {
        self.cell.index
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.on_image_text.iter().chain(&self.background_text)
    }

    /// Everything the cell paints, bottom to top
    ///
    /// Background, image, overlays (image layer before cell layer), text,
    /// then the frame on top.
    pub fn paint_order(&self) -> Vec<PaintStep<'_>> {
        let mut steps = vec![PaintStep::Background(&self.background)];
        if let Some(image) = &self.image {
            steps.push(PaintStep::Image(image));
        }
        steps.extend(self.overlays.iter().map(PaintStep::Overlay));
        steps.extend(self.text_runs().map(PaintStep::Text));
        if let Some(frame) = &self.frame {
            steps.push(PaintStep::Frame(frame));
        }
        steps
    }
}

/// A pool image as drawn in a cell
#[derive(Debug, Clone, PartialEq)]
pub struct SceneImage {
    pub id: String,
    pub src: String,
    pub name: String,
    pub fit: ImageFit,
    pub position: FocalPoint,
    pub filters: FilterChain,
}

/// A single drawing step of a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStep<'a> {
    Background(&'a str),
    Image(&'a SceneImage),
    Overlay(&'a OverlayLayer),
    Text(&'a TextRun),
    Frame(&'a ResolvedFrame),
}

/// The logo, positioned on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct LogoPlacement {
    pub src: String,
    pub position: LogoPosition,
    pub bounds: BoundingBox,
}
