//! Document state: everything a scene is derived from
//!
//! The image pool persists across layout edits. Every other cell-indexed
//! reference follows its cell through structure edits, and is dropped when
//! its cell goes away, so no entry ever points past the last cell.

mod model;
mod loader;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;

use crate::layout::{
    self, resize, Cell, Layout, LayoutConfig, LayoutError, LayoutType, Section,
};
use crate::overlay::{CellOverlay, OverlaySettings};
use crate::platform::Dimensions;
use crate::style::{CellAlignment, CellAlignments, Frame, Padding, Theme};

pub use model::{
    FocalPoint, Fonts, ImageFilters, ImageFit, ImagePoolEntry, Logo, LogoPosition, TextKind,
    TextLayer,
};
pub use loader::{parse_document, read_source};

/// Default color key for cell backgrounds
pub const DEFAULT_BACKGROUND: &str = "primary";

/// A cell reference that pointed past the last cell and was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReference {
    /// An explicit text placement, returned to auto
    TextCell { kind: TextKind, cell: usize },
    /// A cell-keyed setting, named by its document key
    CellSetting { setting: &'static str, cell: usize },
}

/// The complete, immutable input to scene building
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub layout: Layout,
    /// Size limits the structure is normalized with
    pub layout_config: LayoutConfig,
    pub images: Vec<ImagePoolEntry>,
    /// Cell index → image id
    pub cell_images: BTreeMap<usize, String>,
    pub text: BTreeMap<TextKind, TextLayer>,
    /// Explicit text placements; an absent kind is auto-placed
    pub text_cells: BTreeMap<TextKind, usize>,
    pub cell_alignments: CellAlignments,
    /// Global background color key
    pub background: String,
    pub cell_backgrounds: BTreeMap<usize, String>,
    /// Document-wide overlay, used by the legacy image cell and as the base
    /// for cell overlays on cells without an image
    pub overlay: OverlaySettings,
    pub cell_overlays: BTreeMap<usize, CellOverlay>,
    /// Legacy designated image cell
    pub image_cell: Option<usize>,
    pub theme: Theme,
    pub fonts: Fonts,
    pub padding: Padding,
    pub frame: Frame,
    pub logo: Option<Logo>,
    pub dimensions: Dimensions,
    /// References the source document held past its last cell, dropped on load
    pub stale_references: Vec<StaleReference>,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self {
            layout: Layout::fullbleed(),
            layout_config: LayoutConfig::default(),
            images: vec![],
            cell_images: BTreeMap::new(),
            text: BTreeMap::new(),
            text_cells: BTreeMap::new(),
            cell_alignments: CellAlignments::new(),
            background: DEFAULT_BACKGROUND.to_string(),
            cell_backgrounds: BTreeMap::new(),
            overlay: OverlaySettings::default(),
            cell_overlays: BTreeMap::new(),
            image_cell: None,
            theme: Theme::default(),
            fonts: Fonts::default(),
            padding: Padding::default(),
            frame: Frame::default(),
            logo: None,
            dimensions: Dimensions::default(),
            stale_references: Vec::new(),
        }
    }
}

impl DocumentState {
    /// Create an empty fullbleed document
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells of the current layout
    pub fn cells(&self) -> Vec<Cell> {
        layout::resolve_cells_with_config(&self.layout, &self.layout_config)
    }

    pub fn cell_count(&self) -> usize {
        layout::cell_count_with_config(&self.layout, &self.layout_config)
    }

    /// Look up a pool image by id
    pub fn image(&self, id: &str) -> Option<&ImagePoolEntry> {
        self.images.iter().find(|image| image.id == id)
    }

    /// The image shown in a cell, if it is assigned and still in the pool
    pub fn image_in_cell(&self, cell: usize) -> Option<&ImagePoolEntry> {
        self.cell_images.get(&cell).and_then(|id| self.image(id))
    }

    /// Text layer by kind
    pub fn text_layer(&self, kind: TextKind) -> Option<&TextLayer> {
        self.text.get(&kind)
    }

    // ── Image pool ────────────────────────────────────────────────

    /// Add an image to the pool, replacing one with the same id
    pub fn add_image(&mut self, entry: ImagePoolEntry) {
        match self.images.iter_mut().find(|image| image.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.images.push(entry),
        }
    }

    /// Remove an image from the pool and every cell assignment pointing at it
    pub fn remove_image(&mut self, id: &str) -> Option<ImagePoolEntry> {
        let position = self.images.iter().position(|image| image.id == id)?;
        let removed = self.images.remove(position);
        self.cell_images.retain(|_, assigned| assigned != id);
        Some(removed)
    }

    /// Put a pool image into a cell, or clear the cell with `None`
    ///
    /// Returns `false` and changes nothing when the cell does not exist or
    /// the id is not in the pool.
    pub fn assign_image(&mut self, cell: usize, id: Option<&str>) -> bool {
        if cell >= self.cell_count() {
            return false;
        }
        match id {
            Some(id) if self.image(id).is_none() => false,
            Some(id) => {
                self.cell_images.insert(cell, id.to_string());
                true
            }
            None => {
                self.cell_images.remove(&cell);
                true
            }
        }
    }

    /// First cell without an image, if any
    pub fn first_empty_cell(&self) -> Option<usize> {
        (0..self.cell_count()).find(|cell| !self.cell_images.contains_key(cell))
    }

    // ── Text and per-cell styling ─────────────────────────────────

    pub fn set_text(&mut self, kind: TextKind, layer: TextLayer) {
        self.text.insert(kind, layer);
    }

    /// Pin a text layer to a cell, or return it to auto-placement with `None`
    pub fn assign_text(&mut self, kind: TextKind, cell: Option<usize>) -> bool {
        match cell {
            Some(cell) if cell >= self.cell_count() => false,
            Some(cell) => {
                self.text_cells.insert(kind, cell);
                true
            }
            None => {
                self.text_cells.remove(&kind);
                true
            }
        }
    }

    pub fn set_cell_alignment(&mut self, cell: usize, alignment: CellAlignment) {
        self.cell_alignments.insert(cell, alignment);
    }

    pub fn set_cell_overlay(&mut self, cell: usize, overlay: CellOverlay) {
        self.cell_overlays.insert(cell, overlay);
    }

    pub fn set_cell_background(&mut self, cell: usize, color: impl Into<String>) {
        self.cell_backgrounds.insert(cell, color.into());
    }

    // ── Layout edits ──────────────────────────────────────────────

    /// Replace the layout; non-fullbleed structures are normalized
    pub fn set_layout(&mut self, layout: Layout, config: &LayoutConfig) {
        self.layout = if layout.is_fullbleed() {
            layout
        } else {
            layout::normalize_layout(&layout, config)
        };
        self.layout_config = config.clone();
        self.prune_stale_references();
    }

    /// Switch the layout type, keeping the structure where possible
    ///
    /// A rows/columns layout with no sections gets two equal sections.
    pub fn set_layout_type(&mut self, layout_type: LayoutType, config: &LayoutConfig) {
        let mut layout = self.layout.clone();
        layout.layout_type = layout_type;
        if layout_type != LayoutType::Fullbleed && layout.structure.is_empty() {
            layout.structure = vec![Section::new(50.0, 1), Section::new(50.0, 1)];
        }
        self.set_layout(layout, config);
    }

    fn editable_structure(&mut self, action: &'static str) -> Result<&mut Vec<Section>, LayoutError> {
        if self.layout.is_fullbleed() {
            return Err(LayoutError::FullbleedStructure { action });
        }
        Ok(&mut self.layout.structure)
    }

    /// Append a section; existing cells keep their indices
    pub fn add_section(&mut self, config: &LayoutConfig) -> Result<usize, LayoutError> {
        let structure = self.editable_structure("extended")?;
        let index = resize::add_section(structure, config)?;
        self.layout_config = config.clone();
        Ok(index)
    }

    /// Remove a section along with everything assigned to its cells
    ///
    /// Cells of later sections move up; their references move with them.
    pub fn remove_section(&mut self, index: usize) -> Result<Section, LayoutError> {
        let before = self.cells();
        let structure = self.editable_structure("reduced")?;
        let removed = resize::remove_section(structure, index)?;
        self.relocate_cells(&before, |section, sub| match section.cmp(&index) {
            Ordering::Less => Some((section, sub)),
            Ordering::Equal => None,
            Ordering::Greater => Some((section - 1, sub)),
        });
        Ok(removed)
    }

    pub fn set_subdivisions(
        &mut self,
        index: usize,
        count: usize,
        config: &LayoutConfig,
    ) -> Result<(), LayoutError> {
        let before = self.cells();
        let structure = self.editable_structure("subdivided")?;
        resize::set_subdivisions(structure, index, count, config)?;
        let kept = self.layout.structure[index].subdivisions;
        self.layout_config = config.clone();
        self.relocate_cells(&before, |section, sub| {
            (section != index || sub < kept).then_some((section, sub))
        });
        Ok(())
    }

    pub fn resize_section(
        &mut self,
        index: usize,
        size: f64,
        config: &LayoutConfig,
    ) -> Result<(), LayoutError> {
        let structure = self.editable_structure("resized")?;
        resize::resize_section(structure, index, size, config)?;
        self.layout_config = config.clone();
        Ok(())
    }

    pub fn resize_subdivision(
        &mut self,
        section: usize,
        sub_index: usize,
        size: f64,
        config: &LayoutConfig,
    ) -> Result<(), LayoutError> {
        let structure = self.editable_structure("resized")?;
        resize::resize_subdivision(structure, section, sub_index, size, config)?;
        self.layout_config = config.clone();
        Ok(())
    }

    /// Move every cell-indexed reference to the cell now at the same
    /// section/subdivision position
    ///
    /// `before` is the cell list prior to the edit; `relocate` maps an old
    /// `(section, sub)` to its new position, or `None` when the cell is gone.
    fn relocate_cells(
        &mut self,
        before: &[Cell],
        relocate: impl Fn(usize, usize) -> Option<(usize, usize)>,
    ) {
        let after = self.cells();
        let mapping: Vec<Option<usize>> = before
            .iter()
            .map(|cell| {
                let (section, sub) = relocate(cell.section_index, cell.sub_index)?;
                after
                    .iter()
                    .position(|c| c.section_index == section && c.sub_index == sub)
            })
            .collect();
        let moved = |cell: usize| mapping.get(cell).copied().flatten();

        fn rekey<T>(map: &mut BTreeMap<usize, T>, moved: &impl Fn(usize) -> Option<usize>) -> usize {
            let before = map.len();
            *map = std::mem::take(map)
                .into_iter()
                .filter_map(|(cell, value)| moved(cell).map(|cell| (cell, value)))
                .collect();
            before - map.len()
        }

        let mut dropped = 0;
        dropped += rekey(&mut self.cell_images, &moved);
        dropped += rekey(&mut self.cell_alignments, &moved);
        dropped += rekey(&mut self.cell_backgrounds, &moved);
        dropped += rekey(&mut self.cell_overlays, &moved);
        dropped += rekey(&mut self.padding.cells, &moved);
        dropped += rekey(&mut self.frame.cells, &moved);

        let before_text = self.text_cells.len();
        self.text_cells = std::mem::take(&mut self.text_cells)
            .into_iter()
            .filter_map(|(kind, cell)| moved(cell).map(|cell| (kind, cell)))
            .collect();
        dropped += before_text - self.text_cells.len();

        if let Some(cell) = self.image_cell {
            self.image_cell = moved(cell);
            if self.image_cell.is_none() {
                dropped += 1;
            }
        }

        if dropped > 0 {
            debug!("dropped {} references to removed cells", dropped);
        }
    }

    /// Drop every cell-indexed reference at or past the current cell count
    ///
    /// Explicit text placements return to auto. Returns what was dropped.
    pub fn prune_stale_references(&mut self) -> Vec<StaleReference> {
        let count = self.cell_count();
        let mut stale = Vec::new();

        fn prune<T>(
            map: &mut BTreeMap<usize, T>,
            setting: &'static str,
            count: usize,
            stale: &mut Vec<StaleReference>,
        ) {
            let past: Vec<usize> = map.range(count..).map(|(cell, _)| *cell).collect();
            for cell in past {
                map.remove(&cell);
                stale.push(StaleReference::CellSetting { setting, cell });
            }
        }

        prune(&mut self.cell_images, "cell_images", count, &mut stale);
        prune(&mut self.cell_alignments, "cell_alignments", count, &mut stale);
        prune(&mut self.cell_backgrounds, "cell_backgrounds", count, &mut stale);
        prune(&mut self.cell_overlays, "cell_overlays", count, &mut stale);
        prune(&mut self.padding.cells, "padding.cells", count, &mut stale);
        prune(&mut self.frame.cells, "frame.cells", count, &mut stale);

        for (&kind, &cell) in &self.text_cells {
            if cell >= count {
                stale.push(StaleReference::TextCell { kind, cell });
            }
        }
        self.text_cells.retain(|_, cell| *cell < count);

        if let Some(cell) = self.image_cell.filter(|cell| *cell >= count) {
            self.image_cell = None;
            stale.push(StaleReference::CellSetting {
                setting: "image_cell",
                cell,
            });
        }

        if !stale.is_empty() {
            debug!("dropped {} references past cell {}", stale.len(), count);
        }
        stale
    }
}
