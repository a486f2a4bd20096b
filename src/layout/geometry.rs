//! Geometry resolution: structure → flat, ordered cells

use log::debug;

use super::config::LayoutConfig;
use super::resize::{equal_shares, normalize_group};
use super::types::{Cell, Layout, LayoutType, PercentRect, Section, Structure};

/// Bring a layout's structure into canonical form
///
/// - `fullbleed` always becomes one full section with one subdivision
/// - an empty structure becomes the same single full section
/// - subdivision counts are clamped to `1..=max_subdivisions`
/// - a `sub_sizes` list whose length disagrees with the count is replaced
///   by equal shares
/// - every sibling group is clamped and rebalanced to sum to 100
pub fn normalize_structure(layout: &Layout, config: &LayoutConfig) -> Structure {
    if layout.layout_type == LayoutType::Fullbleed {
        return vec![Section::full()];
    }
    if layout.structure.is_empty() {
        debug!("{} layout without sections, using one full section", layout.layout_type.as_str());
        return vec![Section::full()];
    }

    let sizes: Vec<f64> = layout.structure.iter().map(|s| s.size).collect();
    let sizes = normalize_group(&sizes, config);

    layout
        .structure
        .iter()
        .zip(sizes)
        .map(|(section, size)| {
            let subdivisions = section.subdivisions.clamp(1, config.max_subdivisions);
            let sub_sizes = if section.sub_sizes.len() == subdivisions {
                normalize_group(&section.sub_sizes, config)
            } else {
                debug!(
                    "section has {} sub sizes for {} subdivisions, using equal shares",
                    section.sub_sizes.len(),
                    subdivisions
                );
                equal_shares(subdivisions)
            };
            Section {
                size,
                subdivisions,
                sub_sizes,
            }
        })
        .collect()
}

/// Return a copy of the layout with its structure normalized
pub fn normalize_layout(layout: &Layout, config: &LayoutConfig) -> Layout {
    Layout {
        structure: normalize_structure(layout, config),
        ..layout.clone()
    }
}

/// Expand a layout into its ordered list of cells
///
/// Traversal order is definitional: sections in order, then subdivisions in
/// order. One cell is emitted per subdivision, even for single-subdivision
/// sections.
pub fn resolve_cells(layout: &Layout) -> Vec<Cell> {
    resolve_cells_with_config(layout, &LayoutConfig::default())
}

/// [`resolve_cells`] with explicit size limits
pub fn resolve_cells_with_config(layout: &Layout, config: &LayoutConfig) -> Vec<Cell> {
    let structure = normalize_structure(layout, config);
    let mut cells = Vec::with_capacity(structure.iter().map(|s| s.subdivisions).sum());
    let mut primary_offset = 0.0;

    for (section_index, section) in structure.iter().enumerate() {
        let mut secondary_offset = 0.0;
        for (sub_index, &sub_size) in section.sub_sizes.iter().enumerate() {
            let rect = match layout.layout_type {
                LayoutType::Columns => {
                    PercentRect::new(primary_offset, secondary_offset, section.size, sub_size)
                }
                LayoutType::Rows | LayoutType::Fullbleed => {
                    PercentRect::new(secondary_offset, primary_offset, sub_size, section.size)
                }
            };
            cells.push(Cell {
                index: cells.len(),
                section_index,
                sub_index,
                section_size_pct: section.size,
                sub_size_pct: sub_size,
                rect,
            });
            secondary_offset += sub_size;
        }
        primary_offset += section.size;
    }

    cells
}

/// Number of cells a layout resolves to
pub fn cell_count(layout: &Layout) -> usize {
    cell_count_with_config(layout, &LayoutConfig::default())
}

/// [`cell_count`] with explicit size limits
pub fn cell_count_with_config(layout: &Layout, config: &LayoutConfig) -> usize {
    normalize_structure(layout, config)
        .iter()
        .map(|s| s.subdivisions)
        .sum()
}
