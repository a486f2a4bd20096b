//! Lint checks for composition defects
//!
//! Runs after the scene is built and reports things that render but are
//! probably not what the author meant: text layers with nowhere to go,
//! references to missing images or cells, unused pool images, and text
//! blocks taller than their cell.

use std::collections::BTreeSet;
use std::fmt;

use crate::document::{DocumentState, StaleReference, TextKind};
use crate::scene::text::stack_height;
use crate::scene::Scene;

/// A lint warning about a composition defect
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Placement,
    Reference,
    Image,
    Overflow,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Placement => write!(f, "placement"),
            LintCategory::Reference => write!(f, "reference"),
            LintCategory::Image => write!(f, "image"),
            LintCategory::Overflow => write!(f, "overflow"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks on a built scene
pub fn check(doc: &DocumentState, scene: &Scene) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_placement(doc, scene, &mut warnings);
    check_references(doc, &mut warnings);
    check_images(doc, &mut warnings);
    check_overflow(scene, &mut warnings);
    warnings
}

// ── Placement ─────────────────────────────────────────────────────

fn check_placement(doc: &DocumentState, scene: &Scene, warnings: &mut Vec<LintWarning>) {
    let rendered: BTreeSet<TextKind> = scene.text_runs().map(|run| run.kind).collect();
    for kind in TextKind::ALL {
        let Some(layer) = doc.text_layer(kind) else {
            continue;
        };
        if !layer.renders() || rendered.contains(&kind) {
            continue;
        }
        let reason = if crate::content::is_hero_layer(kind) {
            "no cell has an image"
        } else {
            "every cell has an image"
        };
        warnings.push(LintWarning {
            category: LintCategory::Placement,
            message: format!(
                "{} is not rendered: {}; assign it to a cell explicitly",
                kind, reason
            ),
        });
    }
}

// ── References ────────────────────────────────────────────────────

fn check_references(doc: &DocumentState, warnings: &mut Vec<LintWarning>) {
    let count = doc.cell_count();

    // Already dropped while loading; the live checks below cannot see them
    for stale in &doc.stale_references {
        let message = match stale {
            StaleReference::TextCell { kind, cell } => format!(
                "{} is assigned to cell {} but the layout has {} cells",
                kind, cell, count
            ),
            StaleReference::CellSetting { setting, cell } => format!(
                "{} for cell {} is ignored, the layout has {} cells",
                setting, cell, count
            ),
        };
        warnings.push(LintWarning {
            category: LintCategory::Reference,
            message,
        });
    }

    for (cell, id) in &doc.cell_images {
        if doc.image(id).is_none() {
            warnings.push(LintWarning {
                category: LintCategory::Reference,
                message: format!("cell {} shows image \"{}\" which is not in the pool", cell, id),
            });
        }
    }

    for (kind, cell) in &doc.text_cells {
        if *cell >= count {
            warnings.push(LintWarning {
                category: LintCategory::Reference,
                message: format!(
                    "{} is assigned to cell {} but the layout has {} cells",
                    kind, cell, count
                ),
            });
        }
    }

    let stale_cells: BTreeSet<usize> = doc
        .cell_images
        .keys()
        .chain(doc.cell_backgrounds.keys())
        .chain(doc.cell_overlays.keys())
        .chain(doc.cell_alignments.keys())
        .chain(doc.padding.cells.keys())
        .chain(doc.frame.cells.keys())
        .chain(doc.image_cell.iter())
        .copied()
        .filter(|cell| *cell >= count)
        .collect();
    for cell in stale_cells {
        warnings.push(LintWarning {
            category: LintCategory::Reference,
            message: format!(
                "settings for cell {} are ignored, the layout has {} cells",
                cell, count
            ),
        });
    }
}

// ── Images ────────────────────────────────────────────────────────

fn check_images(doc: &DocumentState, warnings: &mut Vec<LintWarning>) {
    let used: BTreeSet<&str> = doc.cell_images.values().map(|id| id.as_str()).collect();
    for image in &doc.images {
        if !used.contains(image.id.as_str()) {
            warnings.push(LintWarning {
                category: LintCategory::Image,
                message: format!("image \"{}\" is not shown in any cell", image.id),
            });
        }
    }
}

// ── Overflow ──────────────────────────────────────────────────────

fn check_overflow(scene: &Scene, warnings: &mut Vec<LintWarning>) {
    for cell in &scene.cells {
        let available = cell.content_box.height;
        for runs in [&cell.on_image_text, &cell.background_text] {
            if runs.is_empty() {
                continue;
            }
            let needed = stack_height(runs);
            if needed > available + 0.5 {
                warnings.push(LintWarning {
                    category: LintCategory::Overflow,
                    message: format!(
                        "text in cell {} needs about {:.0}px but only {:.0}px are available",
                        cell.index(),
                        needed,
                        available
                    ),
                });
            }
        }
    }
}
