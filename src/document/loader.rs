//! TOML document loading
//!
//! The TOML shape is loose: almost every field is optional. Defaults are
//! filled in here, once, so the rest of the crate works with complete values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::error::DocumentError;
use crate::layout::{normalize_layout, Layout, LayoutType, Section, TextAlign, VerticalAlign};
use crate::overlay::{CellOverlay, OverlaySettings};
use crate::platform::{Dimensions, DEFAULT_PLATFORM_ID};
use crate::style::{CellAlignment, Frame, FrameSpec, Padding, Theme, DEFAULT_THEME_ID};
use crate::ComposeConfig;

use super::model::{
    FocalPoint, Fonts, ImageFilters, ImageFit, ImagePoolEntry, Logo, LogoPosition, TextKind,
    TextLayer,
};
use super::{DocumentState, DEFAULT_BACKGROUND};

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlDocument {
    platform: Option<String>,
    dimensions: Option<TomlDimensions>,
    theme: Option<TomlThemeRef>,
    background: Option<String>,
    layout: Option<TomlLayout>,
    images: Vec<TomlImage>,
    cell_images: BTreeMap<String, String>,
    text: BTreeMap<String, TomlTextLayer>,
    text_cells: BTreeMap<String, i64>,
    cell_alignments: BTreeMap<String, TomlAlignment>,
    cell_backgrounds: BTreeMap<String, String>,
    overlay: Option<TomlOverlay>,
    cell_overlays: BTreeMap<String, TomlCellOverlay>,
    image_cell: Option<usize>,
    padding: Option<TomlPadding>,
    frame: Option<TomlFrame>,
    fonts: Option<TomlFonts>,
    logo: Option<TomlLogo>,
}

#[derive(Deserialize)]
struct TomlDimensions {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TomlThemeRef {
    Id(String),
    Custom {
        name: Option<String>,
        primary: String,
        secondary: String,
        accent: String,
    },
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlLayout {
    #[serde(rename = "type")]
    layout_type: LayoutType,
    structure: Vec<Section>,
    text_align: TextAlign,
    text_vertical_align: VerticalAlign,
}

#[derive(Deserialize)]
struct TomlImage {
    id: String,
    src: String,
    name: Option<String>,
    fit: Option<ImageFit>,
    position: Option<FocalPoint>,
    filters: Option<ImageFilters>,
    overlay: Option<TomlOverlay>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlOverlay {
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    opacity: Option<f64>,
}

#[derive(Deserialize)]
struct TomlCellOverlay {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    opacity: Option<f64>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct TomlTextLayer {
    #[serde(default)]
    content: String,
    #[serde(default = "default_true")]
    visible: bool,
    color: Option<String>,
    size: Option<f64>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    letter_spacing: f64,
    text_align: Option<TextAlign>,
}

#[derive(Deserialize)]
struct TomlAlignment {
    text_align: Option<TextAlign>,
    text_vertical_align: Option<VerticalAlign>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlPadding {
    global: Option<f64>,
    cells: BTreeMap<String, f64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlFrame {
    outer: Option<TomlFrameSpec>,
    cells: BTreeMap<String, TomlFrameSpec>,
}

#[derive(Deserialize)]
struct TomlFrameSpec {
    percent: f64,
    #[serde(default = "default_frame_color")]
    color: String,
}

fn default_frame_color() -> String {
    "white".to_string()
}

#[derive(Deserialize)]
struct TomlFonts {
    heading: Option<String>,
    body: Option<String>,
}

#[derive(Deserialize)]
struct TomlLogo {
    src: String,
    #[serde(default)]
    position: LogoPosition,
    size: Option<f64>,
}

/// Read a document's source text from disk
pub fn read_source(path: &Path) -> Result<String, DocumentError> {
    let source = fs::read_to_string(path)?;
    debug!("read {} bytes from {}", source.len(), path.display());
    Ok(source)
}

/// Parse a TOML document and fill every default
///
/// Theme and platform ids are looked up in the configured catalogs; the
/// layout structure is normalized with the configured size limits; cell
/// references past the resulting cell count are dropped and recorded in
/// [`DocumentState::stale_references`].
pub fn parse_document(source: &str, config: &ComposeConfig) -> Result<DocumentState, DocumentError> {
    let raw: TomlDocument = toml::from_str(source)?;

    let dimensions = match (&raw.dimensions, &raw.platform) {
        (Some(dims), _) => Dimensions::new(dims.width, dims.height),
        (None, Some(id)) => config.platforms.dimensions_or_default(id),
        (None, None) => config.platforms.dimensions_or_default(DEFAULT_PLATFORM_ID),
    };

    let theme = match raw.theme {
        Some(TomlThemeRef::Id(id)) => config.themes.resolve_or_default(&id),
        Some(TomlThemeRef::Custom {
            name,
            primary,
            secondary,
            accent,
        }) => {
            let mut theme = Theme::new("custom", primary, secondary, accent);
            theme.name = name;
            theme
        }
        None => config.themes.resolve_or_default(DEFAULT_THEME_ID),
    };

    let layout = {
        let raw_layout = raw.layout.unwrap_or_default();
        let layout = Layout {
            layout_type: raw_layout.layout_type,
            structure: raw_layout.structure,
            text_align: raw_layout.text_align,
            text_vertical_align: raw_layout.text_vertical_align,
        };
        if layout.is_fullbleed() {
            layout
        } else {
            normalize_layout(&layout, &config.layout)
        }
    };

    let images = raw.images.into_iter().map(convert_image).collect();

    let text = raw
        .text
        .into_iter()
        .filter_map(|(key, layer)| match TextKind::from_id(&key) {
            Some(kind) => Some((kind, convert_text_layer(layer))),
            None => {
                warn!("ignoring unknown text layer '{}'", key);
                None
            }
        })
        .collect();

    let text_cells = raw
        .text_cells
        .into_iter()
        .filter_map(|(key, cell)| {
            let kind = TextKind::from_id(&key).or_else(|| {
                warn!("ignoring placement for unknown text layer '{}'", key);
                None
            })?;
            // negative indices mean auto-placement
            usize::try_from(cell).ok().map(|cell| (kind, cell))
        })
        .collect();

    let cell_alignments = cell_keyed(raw.cell_alignments, "cell_alignments")
        .map(|(cell, a)| {
            let alignment = CellAlignment {
                text_align: a.text_align,
                text_vertical_align: a.text_vertical_align,
            };
            (cell, alignment)
        })
        .collect();

    let cell_overlays = cell_keyed(raw.cell_overlays, "cell_overlays")
        .map(|(cell, o)| {
            let overlay = CellOverlay {
                enabled: o.enabled,
                kind: o.kind,
                color: o.color,
                opacity: o.opacity,
            };
            (cell, overlay)
        })
        .collect();

    let padding = {
        let raw_padding = raw.padding.unwrap_or_default();
        Padding {
            global: raw_padding.global.unwrap_or(Padding::default().global),
            cells: cell_keyed(raw_padding.cells, "padding.cells").collect(),
        }
    };

    let frame = {
        let raw_frame = raw.frame.unwrap_or_default();
        Frame {
            outer: raw_frame.outer.map(convert_frame_spec),
            cells: cell_keyed(raw_frame.cells, "frame.cells")
                .map(|(cell, spec)| (cell, convert_frame_spec(spec)))
                .collect(),
        }
    };

    let fonts = match raw.fonts {
        Some(f) => {
            let defaults = Fonts::default();
            Fonts {
                heading: f.heading.unwrap_or(defaults.heading),
                body: f.body.unwrap_or(defaults.body),
            }
        }
        None => Fonts::default(),
    };

    let logo = raw.logo.map(|l| {
        let mut logo = Logo::new(l.src);
        logo.position = l.position;
        if let Some(size) = l.size {
            logo.size = size;
        }
        logo
    });

    let mut doc = DocumentState {
        layout,
        layout_config: config.layout.clone(),
        images,
        cell_images: cell_keyed(raw.cell_images, "cell_images").collect(),
        text,
        text_cells,
        cell_alignments,
        background: raw
            .background
            .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
        cell_backgrounds: cell_keyed(raw.cell_backgrounds, "cell_backgrounds").collect(),
        overlay: raw
            .overlay
            .map(convert_overlay)
            .unwrap_or_default(),
        cell_overlays,
        image_cell: raw.image_cell,
        theme,
        fonts,
        padding,
        frame,
        logo,
        dimensions,
        stale_references: Vec::new(),
    };
    doc.stale_references = doc.prune_stale_references();
    Ok(doc)
}

/// Convert string-keyed TOML tables into cell-indexed entries
fn cell_keyed<T>(
    map: BTreeMap<String, T>,
    table: &'static str,
) -> impl Iterator<Item = (usize, T)> {
    map.into_iter().filter_map(move |(key, value)| match key.trim().parse::<usize>() {
        Ok(cell) => Some((cell, value)),
        Err(_) => {
            warn!("ignoring non-numeric cell key '{}' in {}", key, table);
            None
        }
    })
}

fn convert_overlay(raw: TomlOverlay) -> OverlaySettings {
    let defaults = OverlaySettings::default();
    OverlaySettings {
        kind: raw.kind.unwrap_or(defaults.kind),
        color: raw.color.unwrap_or(defaults.color),
        opacity: raw.opacity.unwrap_or(defaults.opacity),
    }
}

fn convert_image(raw: TomlImage) -> ImagePoolEntry {
    if raw.fit.is_none() || raw.position.is_none() || raw.filters.is_none() {
        debug!("image '{}' missing fit/position/filters, using defaults", raw.id);
    }
    ImagePoolEntry {
        name: raw.name.unwrap_or_else(|| raw.id.clone()),
        id: raw.id,
        src: raw.src,
        fit: raw.fit.unwrap_or_default(),
        position: raw.position.unwrap_or_default(),
        filters: raw.filters.unwrap_or_default(),
        overlay: raw.overlay.map(convert_overlay).unwrap_or_default(),
    }
}

fn convert_text_layer(raw: TomlTextLayer) -> TextLayer {
    TextLayer {
        content: raw.content,
        visible: raw.visible,
        color: raw.color,
        size: raw.size,
        bold: raw.bold,
        italic: raw.italic,
        letter_spacing: raw.letter_spacing,
        text_align: raw.text_align,
    }
}

fn convert_frame_spec(raw: TomlFrameSpec) -> FrameSpec {
    FrameSpec::new(raw.percent, raw.color)
}
