//! Content assignment: which image and which text layers each cell shows
//!
//! Images are assigned explicitly through `cell_images`. Text layers are
//! either pinned to a cell through `text_cells` or auto-placed:
//!
//! - fullbleed and single-cell layouts put every layer in cell 0
//! - otherwise title, tagline and cta go to the first cell with an image
//!   (on-image text), and body heading, body text and footnote go to the
//!   first cell without one (background text)
//!
//! A hero layer with no image cell to go to renders nowhere. That is the
//! expected outcome, not an error, and it is not re-routed.

use crate::document::{DocumentState, TextKind};

/// Where a text layer renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPlacement {
    pub kind: TextKind,
    pub cell: usize,
    /// Rendered over the cell's image rather than on its background
    pub on_image: bool,
}

/// Resolved content of one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellContent {
    pub cell: usize,
    /// Id of the pool image shown in the cell
    pub image: Option<String>,
    pub on_image_text: Vec<TextKind>,
    pub background_text: Vec<TextKind>,
}

/// Which cells of a layout hold an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOccupancy {
    has_image: Vec<bool>,
}

impl ImageOccupancy {
    pub fn new(has_image: Vec<bool>) -> Self {
        Self { has_image }
    }

    /// Occupancy of a document's current cells
    pub fn of(doc: &DocumentState) -> Self {
        Self::new(
            (0..doc.cell_count())
                .map(|cell| doc.image_in_cell(cell).is_some())
                .collect(),
        )
    }

    pub fn cell_count(&self) -> usize {
        self.has_image.len()
    }

    pub fn has_image(&self, cell: usize) -> bool {
        self.has_image.get(cell).copied().unwrap_or(false)
    }

    /// Lowest-index cell with an image
    pub fn first_image_cell(&self) -> Option<usize> {
        self.has_image.iter().position(|&has| has)
    }

    /// Lowest-index cell without an image
    pub fn first_non_image_cell(&self) -> Option<usize> {
        self.has_image.iter().position(|&has| !has)
    }
}

/// Whether a layer auto-places onto the image cell
pub fn is_hero_layer(kind: TextKind) -> bool {
    matches!(kind, TextKind::Title | TextKind::Tagline | TextKind::Cta)
}

/// Auto-placement for a layer with no explicit cell
pub fn auto_place(kind: TextKind, fullbleed: bool, occupancy: &ImageOccupancy) -> Option<TextPlacement> {
    if fullbleed || occupancy.cell_count() == 1 {
        return Some(TextPlacement {
            kind,
            cell: 0,
            on_image: occupancy.has_image(0),
        });
    }

    if is_hero_layer(kind) {
        occupancy.first_image_cell().map(|cell| TextPlacement {
            kind,
            cell,
            on_image: true,
        })
    } else {
        occupancy.first_non_image_cell().map(|cell| TextPlacement {
            kind,
            cell,
            on_image: false,
        })
    }
}

/// Resolve where one text layer renders, if anywhere
///
/// An explicit placement inside the layout always wins; one past the last
/// cell counts as auto.
pub fn place_text(
    kind: TextKind,
    doc: &DocumentState,
    occupancy: &ImageOccupancy,
) -> Option<TextPlacement> {
    match doc.text_cells.get(&kind) {
        Some(&cell) if cell < occupancy.cell_count() => Some(TextPlacement {
            kind,
            cell,
            on_image: occupancy.has_image(cell),
        }),
        _ => auto_place(kind, doc.layout.is_fullbleed(), occupancy),
    }
}

/// Placements for every layer that has something to render
pub fn text_placements(doc: &DocumentState, occupancy: &ImageOccupancy) -> Vec<TextPlacement> {
    TextKind::ALL
        .into_iter()
        .filter(|kind| doc.text_layer(*kind).is_some_and(|layer| layer.renders()))
        .filter_map(|kind| place_text(kind, doc, occupancy))
        .collect()
}

/// Resolve the content of every cell
pub fn assign_content(doc: &DocumentState) -> Vec<CellContent> {
    let occupancy = ImageOccupancy::of(doc);
    let mut contents: Vec<CellContent> = (0..occupancy.cell_count())
        .map(|cell| CellContent {
            cell,
            image: doc.image_in_cell(cell).map(|image| image.id.clone()),
            ..CellContent::default()
        })
        .collect();

    for placement in text_placements(doc, &occupancy) {
        if let Some(content) = contents.get_mut(placement.cell) {
            if placement.on_image {
                content.on_image_text.push(placement.kind);
            } else {
                content.background_text.push(placement.kind);
            }
        }
    }

    contents
}
