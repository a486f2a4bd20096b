//! Overlay compositing: which color, gradient, and effect layers stack on a cell
//!
//! Overlays come from two places. An image in the pool carries its own
//! overlay, which renders wherever the image is placed. A cell may carry an
//! overlay entry too; its set fields override the image's overlay and its
//! unset fields inherit from it. Layers are returned in paint order: the
//! image-level layer first, the cell-level layer last (on top).

use log::debug;

use crate::style::{resolve_color, with_opacity, Theme};

/// Overlay settings as stored on an image or as the document-wide overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    /// Overlay type id, such as `solid`, `gradient-down` or `grain`
    pub kind: String,
    /// Color reference (theme slot, neutral id, or hex)
    pub color: String,
    /// Opacity in percent (0 to 100)
    pub opacity: f64,
}

impl OverlaySettings {
    pub fn new(kind: impl Into<String>, color: impl Into<String>, opacity: f64) -> Self {
        Self {
            kind: kind.into(),
            color: color.into(),
            opacity,
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::new("solid", "primary", 0.0)
    }
}

/// A cell's overlay entry; unset fields inherit from the image overlay
#[derive(Debug, Clone, PartialEq)]
pub struct CellOverlay {
    pub enabled: bool,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
}

impl CellOverlay {
    /// Suppress the cell-level layer
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            kind: None,
            color: None,
            opacity: None,
        }
    }

    /// Enable the cell-level layer, inheriting every field
    pub fn inherit() -> Self {
        Self {
            enabled: true,
            ..Self::disabled()
        }
    }

    /// Enable the cell-level layer with every field set
    pub fn custom(kind: impl Into<String>, color: impl Into<String>, opacity: f64) -> Self {
        Self {
            enabled: true,
            kind: Some(kind.into()),
            color: Some(color.into()),
            opacity: Some(opacity),
        }
    }
}

/// Direction a linear gradient runs in, from transparent to full color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    Down,
    Up,
    Left,
    Right,
    DownRight,
    DownLeft,
    UpRight,
    UpLeft,
}

impl GradientDirection {
    const ALL: [GradientDirection; 8] = [
        GradientDirection::Down,
        GradientDirection::Up,
        GradientDirection::Left,
        GradientDirection::Right,
        GradientDirection::DownRight,
        GradientDirection::DownLeft,
        GradientDirection::UpRight,
        GradientDirection::UpLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradientDirection::Down => "down",
            GradientDirection::Up => "up",
            GradientDirection::Left => "left",
            GradientDirection::Right => "right",
            GradientDirection::DownRight => "down-right",
            GradientDirection::DownLeft => "down-left",
            GradientDirection::UpRight => "up-right",
            GradientDirection::UpLeft => "up-left",
        }
    }

    /// Gradient angle in degrees, 0 pointing up and increasing clockwise
    pub fn angle(&self) -> u16 {
        match self {
            GradientDirection::Up => 0,
            GradientDirection::UpRight => 45,
            GradientDirection::Right => 90,
            GradientDirection::DownRight => 135,
            GradientDirection::Down => 180,
            GradientDirection::DownLeft => 225,
            GradientDirection::Left => 270,
            GradientDirection::UpLeft => 315,
        }
    }
}

/// Radial overlay shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialFalloff {
    /// Opaque at the edges, transparent in the center
    Vignette,
    /// Opaque in the center, transparent at the edges
    Spotlight,
}

/// Procedural texture for the texture overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    Noise,
    Grain,
}

/// Recognized overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Solid,
    Gradient(GradientDirection),
    Radial(RadialFalloff),
    Texture(Texture),
    BlurEdges,
    Duotone,
}

impl OverlayKind {
    /// Parse a type id; unrecognized ids fall back to `Solid`
    pub fn parse(id: &str) -> OverlayKind {
        match id {
            "solid" => OverlayKind::Solid,
            "vignette" => OverlayKind::Radial(RadialFalloff::Vignette),
            "spotlight" => OverlayKind::Radial(RadialFalloff::Spotlight),
            "noise" => OverlayKind::Texture(Texture::Noise),
            "grain" => OverlayKind::Texture(Texture::Grain),
            "blur-edges" => OverlayKind::BlurEdges,
            "duotone" => OverlayKind::Duotone,
            _ => {
                let direction = id.strip_prefix("gradient-").and_then(|dir| {
                    GradientDirection::ALL
                        .into_iter()
                        .find(|d| d.as_str() == dir)
                });
                match direction {
                    Some(direction) => OverlayKind::Gradient(direction),
                    None => {
                        debug!("unknown overlay type '{}', treating as solid", id);
                        OverlayKind::Solid
                    }
                }
            }
        }
    }

    pub fn id(&self) -> String {
        match self {
            OverlayKind::Solid => "solid".to_string(),
            OverlayKind::Gradient(direction) => format!("gradient-{}", direction.as_str()),
            OverlayKind::Radial(RadialFalloff::Vignette) => "vignette".to_string(),
            OverlayKind::Radial(RadialFalloff::Spotlight) => "spotlight".to_string(),
            OverlayKind::Texture(Texture::Noise) => "noise".to_string(),
            OverlayKind::Texture(Texture::Grain) => "grain".to_string(),
            OverlayKind::BlurEdges => "blur-edges".to_string(),
            OverlayKind::Duotone => "duotone".to_string(),
        }
    }
}

/// Blend mode a layer is composited with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Overlay,
}

/// What a resolved overlay layer paints
///
/// `color` is concrete (already resolved against the theme) and `opacity` is
/// a fraction between 0 and 1.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEffect {
    Fill {
        color: String,
        opacity: f64,
    },
    LinearGradient {
        direction: GradientDirection,
        color: String,
        opacity: f64,
    },
    Radial {
        falloff: RadialFalloff,
        color: String,
        opacity: f64,
    },
    Texture {
        texture: Texture,
        opacity: f64,
        blend: BlendMode,
    },
    /// Inset falloff darkening toward the edges, not a filled rectangle
    EdgeBlur {
        color: String,
        opacity: f64,
    },
    /// Color wash over a forced-grayscale image
    Duotone {
        color: String,
        opacity: f64,
    },
}

impl OverlayEffect {
    /// Build the effect for an overlay kind with a concrete color
    pub fn new(kind: OverlayKind, color: String, opacity: f64) -> Self {
        match kind {
            OverlayKind::Solid => OverlayEffect::Fill { color, opacity },
            OverlayKind::Gradient(direction) => OverlayEffect::LinearGradient {
                direction,
                color,
                opacity,
            },
            OverlayKind::Radial(falloff) => OverlayEffect::Radial {
                falloff,
                color,
                opacity,
            },
            OverlayKind::Texture(texture) => OverlayEffect::Texture {
                texture,
                opacity,
                blend: BlendMode::Overlay,
            },
            OverlayKind::BlurEdges => OverlayEffect::EdgeBlur { color, opacity },
            OverlayKind::Duotone => OverlayEffect::Duotone { color, opacity },
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            OverlayEffect::Fill { opacity, .. }
            | OverlayEffect::LinearGradient { opacity, .. }
            | OverlayEffect::Radial { opacity, .. }
            | OverlayEffect::Texture { opacity, .. }
            | OverlayEffect::EdgeBlur { opacity, .. }
            | OverlayEffect::Duotone { opacity, .. } => *opacity,
        }
    }

    /// Whether the image underneath must be rendered in full grayscale
    pub fn forces_grayscale(&self) -> bool {
        matches!(self, OverlayEffect::Duotone { .. })
    }

    /// CSS paint for the fill, gradient, and radial family
    ///
    /// The special effects (textures, edge blur, duotone) have no flat paint
    /// and return `None`; renderers must handle them individually.
    pub fn paint(&self) -> Option<String> {
        match self {
            OverlayEffect::Fill { color, opacity } => Some(with_opacity(color, *opacity)),
            OverlayEffect::LinearGradient {
                direction,
                color,
                opacity,
            } => Some(format!(
                "linear-gradient({}deg, {} 0%, {} 100%)",
                direction.angle(),
                with_opacity(color, 0.0),
                with_opacity(color, *opacity)
            )),
            OverlayEffect::Radial {
                falloff,
                color,
                opacity,
            } => {
                let (center, edge) = match falloff {
                    RadialFalloff::Vignette => (0.0, *opacity),
                    RadialFalloff::Spotlight => (*opacity, 0.0),
                };
                Some(format!(
                    "radial-gradient(ellipse at center, {} 0%, {} 100%)",
                    with_opacity(color, center),
                    with_opacity(color, edge)
                ))
            }
            OverlayEffect::Texture { .. }
            | OverlayEffect::EdgeBlur { .. }
            | OverlayEffect::Duotone { .. } => None,
        }
    }
}

/// Which configuration a layer was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    Image,
    Cell,
}

/// One overlay layer of a cell, in paint order
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub source: LayerSource,
    pub kind: OverlayKind,
    pub effect: OverlayEffect,
}

/// Overlay configuration that applies to a single cell
#[derive(Debug, Clone, Copy)]
pub struct OverlayInputs<'a> {
    /// Overlay of the image assigned to the cell, if any
    pub image_overlay: Option<&'a OverlaySettings>,
    /// The cell's own overlay entry, if any
    pub cell_overlay: Option<&'a CellOverlay>,
    /// Document-wide overlay, inherited when the cell has no image
    pub global_overlay: &'a OverlaySettings,
    /// Whether this cell is the legacy designated image cell
    pub legacy_image_cell: bool,
}

const OVERLAY_FALLBACK_COLOR: &str = "#000000";

/// Compute the overlay layers to stack on a cell, bottom first
pub fn compose_overlays(inputs: &OverlayInputs, theme: &Theme) -> Vec<OverlayLayer> {
    let mut layers = Vec::with_capacity(2);

    if let Some(image_overlay) = inputs.image_overlay {
        layers.extend(resolve_layer(LayerSource::Image, image_overlay, theme));
    }

    if let Some(settings) = cell_settings(inputs) {
        layers.extend(resolve_layer(LayerSource::Cell, &settings, theme));
    }

    layers
}

/// Whether a duotone overlay is selected for the cell
///
/// Selection alone turns the image grayscale, even when the overlay's
/// opacity leaves no visible color layer.
pub fn selects_duotone(inputs: &OverlayInputs) -> bool {
    inputs
        .image_overlay
        .cloned()
        .into_iter()
        .chain(cell_settings(inputs))
        .any(|settings| OverlayKind::parse(&settings.kind) == OverlayKind::Duotone)
}

/// The cell-level overlay after falling back field by field to its base
fn cell_settings(inputs: &OverlayInputs) -> Option<OverlaySettings> {
    match inputs.cell_overlay {
        Some(cell) if !cell.enabled => None,
        Some(cell) => {
            let base = inputs.image_overlay.unwrap_or(inputs.global_overlay);
            Some(OverlaySettings {
                kind: cell.kind.clone().unwrap_or_else(|| base.kind.clone()),
                color: cell.color.clone().unwrap_or_else(|| base.color.clone()),
                opacity: cell.opacity.unwrap_or(base.opacity),
            })
        }
        None if inputs.legacy_image_cell => Some(inputs.global_overlay.clone()),
        None => None,
    }
}

fn resolve_layer(
    source: LayerSource,
    settings: &OverlaySettings,
    theme: &Theme,
) -> Option<OverlayLayer> {
    let opacity = settings.opacity.clamp(0.0, 100.0) / 100.0;
    if opacity <= 0.0 {
        return None;
    }
    let kind = OverlayKind::parse(&settings.kind);
    let color = resolve_color(&settings.color, theme, OVERLAY_FALLBACK_COLOR);
    Some(OverlayLayer {
        source,
        kind,
        effect: OverlayEffect::new(kind, color, opacity),
    })
}
