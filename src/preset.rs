//! Layout and style presets
//!
//! A layout preset replaces a document's layout and text placement; a style
//! preset replaces its theme, fonts, padding, frame, background and text
//! colors. Neither touches the image pool or image assignments.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::document::{DocumentState, Fonts, TextKind};
use crate::error::CatalogError;
use crate::layout::{Layout, LayoutConfig, LayoutType, Section, TextAlign, VerticalAlign};
use crate::overlay::OverlaySettings;
use crate::style::{Frame, FrameSpec, Padding, ThemeCatalog};

/// A stored layout preset
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPreset {
    pub id: String,
    pub name: Option<String>,
    pub layout: Layout,
    /// Explicit text placements; layers not listed are auto-placed
    pub text_cells: BTreeMap<TextKind, usize>,
}

/// A stored style preset; `None` fields leave the document unchanged
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylePreset {
    pub id: String,
    pub name: Option<String>,
    pub theme: Option<String>,
    pub fonts: Option<Fonts>,
    pub padding: Option<f64>,
    pub frame: Option<FrameSpec>,
    pub background: Option<String>,
    pub overlay: Option<OverlaySettings>,
    pub text_colors: BTreeMap<TextKind, String>,
}

const DEFAULT_PRESETS: &str = r##"
[layouts.single]
name = "Single image"
type = "fullbleed"

[layouts.split-horizontal]
name = "Split (top / bottom)"
type = "rows"
structure = [{ size = 50 }, { size = 50 }]

[layouts.split-vertical]
name = "Split (left / right)"
type = "columns"
structure = [{ size = 50 }, { size = 50 }]

[layouts.hero-top]
name = "Hero on top"
type = "rows"
text_vertical_align = "end"
structure = [{ size = 65 }, { size = 35 }]

[layouts.triptych]
name = "Triptych"
type = "columns"
structure = [{ size = 34 }, { size = 33 }, { size = 33 }]

[layouts.grid-2x2]
name = "Grid 2x2"
type = "rows"
structure = [{ size = 50, subdivisions = 2 }, { size = 50, subdivisions = 2 }]

[layouts.feature-grid]
name = "Feature with details"
type = "rows"
structure = [{ size = 60 }, { size = 40, subdivisions = 3 }]

[layouts.feature-grid.text_cells]
body_heading = 2

[styles.minimal]
name = "Minimal"
theme = "mono"
padding = 60
background = "off-white"
fonts = { heading = "Inter", body = "Inter" }

[styles.bold]
name = "Bold"
theme = "sunset"
padding = 32
background = "primary"
fonts = { heading = "Montserrat", body = "Open Sans" }
frame = { percent = 50, color = "white" }

[styles.bold.text_colors]
title = "white"
cta = "accent"

[styles.editorial]
name = "Editorial"
theme = "classic"
padding = 48
background = "secondary"
fonts = { heading = "Playfair Display", body = "Source Sans Pro" }
overlay = { type = "gradient-up", color = "black", opacity = 40 }

[styles.editorial.text_colors]
body_heading = "accent"
"##;

/// TOML structure for deserializing preset files
#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlPresets {
    layouts: BTreeMap<String, TomlLayoutPreset>,
    styles: BTreeMap<String, TomlStylePreset>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlLayoutPreset {
    name: Option<String>,
    #[serde(rename = "type")]
    layout_type: LayoutType,
    structure: Vec<Section>,
    text_align: TextAlign,
    text_vertical_align: VerticalAlign,
    text_cells: BTreeMap<String, usize>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlStylePreset {
    name: Option<String>,
    theme: Option<String>,
    fonts: Option<TomlFonts>,
    padding: Option<f64>,
    frame: Option<TomlFrame>,
    background: Option<String>,
    overlay: Option<TomlOverlay>,
    text_colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlFonts {
    heading: Option<String>,
    body: Option<String>,
}

#[derive(Deserialize)]
struct TomlFrame {
    percent: f64,
    color: Option<String>,
}

#[derive(Deserialize)]
struct TomlOverlay {
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    opacity: Option<f64>,
}

fn text_kinds<V>(raw: BTreeMap<String, V>, preset: &str) -> BTreeMap<TextKind, V> {
    raw.into_iter()
        .filter_map(|(key, value)| match TextKind::from_id(&key) {
            Some(kind) => Some((kind, value)),
            None => {
                warn!("preset '{}': ignoring unknown text layer '{}'", preset, key);
                None
            }
        })
        .collect()
}

/// Registry of layout and style presets
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    layouts: BTreeMap<String, LayoutPreset>,
    styles: BTreeMap<String, StylePreset>,
}

impl PresetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in presets
    pub fn builtin() -> Self {
        Self::from_str(DEFAULT_PRESETS).expect("Default presets should be valid TOML")
    }

    /// Load presets from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load presets from a TOML string
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlPresets = toml::from_str(content)?;

        let layouts = parsed
            .layouts
            .into_iter()
            .map(|(id, raw)| {
                let preset = LayoutPreset {
                    name: raw.name,
                    layout: Layout {
                        layout_type: raw.layout_type,
                        structure: raw.structure,
                        text_align: raw.text_align,
                        text_vertical_align: raw.text_vertical_align,
                    },
                    text_cells: text_kinds(raw.text_cells, &id),
                    id: id.clone(),
                };
                (id, preset)
            })
            .collect();

        let styles = parsed
            .styles
            .into_iter()
            .map(|(id, raw)| {
                let defaults = Fonts::default();
                let preset = StylePreset {
                    name: raw.name,
                    theme: raw.theme,
                    fonts: raw.fonts.map(|f| Fonts {
                        heading: f.heading.unwrap_or(defaults.heading),
                        body: f.body.unwrap_or(defaults.body),
                    }),
                    padding: raw.padding,
                    frame: raw.frame.map(|f| {
                        FrameSpec::new(f.percent, f.color.unwrap_or_else(|| "white".to_string()))
                    }),
                    background: raw.background,
                    overlay: raw.overlay.map(|o| {
                        let defaults = OverlaySettings::default();
                        OverlaySettings {
                            kind: o.kind.unwrap_or(defaults.kind),
                            color: o.color.unwrap_or(defaults.color),
                            opacity: o.opacity.unwrap_or(defaults.opacity),
                        }
                    }),
                    text_colors: text_kinds(raw.text_colors, &id),
                    id: id.clone(),
                };
                (id, preset)
            })
            .collect();

        Ok(Self { layouts, styles })
    }

    /// Add the presets of another registry, replacing ids that already exist
    pub fn merge(mut self, other: PresetRegistry) -> Self {
        self.layouts.extend(other.layouts);
        self.styles.extend(other.styles);
        self
    }

    pub fn layout(&self, id: &str) -> Option<&LayoutPreset> {
        self.layouts.get(id)
    }

    pub fn style(&self, id: &str) -> Option<&StylePreset> {
        self.styles.get(id)
    }

    pub fn layout_ids(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(|k| k.as_str())
    }

    pub fn style_ids(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(|k| k.as_str())
    }

    /// Replace the document's layout and text placement with a preset's
    pub fn apply_layout(
        &self,
        doc: &mut DocumentState,
        id: &str,
        config: &LayoutConfig,
    ) -> Result<(), CatalogError> {
        let preset = self.layout(id).ok_or_else(|| CatalogError::PresetNotFound {
            name: id.to_string(),
        })?;

        doc.set_layout(preset.layout.clone(), config);
        doc.text_cells.clear();
        for (kind, cell) in &preset.text_cells {
            if !doc.assign_text(*kind, Some(*cell)) {
                debug!(
                    "layout preset '{}': cell {} for {} is past the layout, auto-placing",
                    id, cell, kind
                );
            }
        }
        debug!("applied layout preset '{}' ({} cells)", id, doc.cell_count());
        Ok(())
    }

    /// Replace the document's styling with a preset's
    pub fn apply_style(
        &self,
        doc: &mut DocumentState,
        id: &str,
        themes: &ThemeCatalog,
    ) -> Result<(), CatalogError> {
        let preset = self.style(id).ok_or_else(|| CatalogError::PresetNotFound {
            name: id.to_string(),
        })?;

        if let Some(theme) = &preset.theme {
            doc.theme = themes.resolve_or_default(theme);
        }
        if let Some(fonts) = &preset.fonts {
            doc.fonts = fonts.clone();
        }
        if let Some(padding) = preset.padding {
            doc.padding = Padding::new(padding);
        }
        doc.frame = Frame {
            outer: preset.frame.clone(),
            cells: BTreeMap::new(),
        };
        if let Some(background) = &preset.background {
            doc.background = background.clone();
            doc.cell_backgrounds.clear();
        }
        if let Some(overlay) = &preset.overlay {
            doc.overlay = overlay.clone();
        }
        for (kind, color) in &preset.text_colors {
            if let Some(layer) = doc.text.get_mut(kind) {
                layer.color = Some(color.clone());
            }
        }
        doc.prune_stale_references();
        debug!("applied style preset '{}'", id);
        Ok(())
    }
}
