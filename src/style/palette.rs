//! Color palettes: theme slots, the fixed neutral palette, and color resolution
//!
//! A color reference is a short key. `primary`, `secondary` and `accent` name
//! slots of the active [`Theme`]; ids such as `slate` or `charcoal` name fixed
//! neutral colors that ignore the theme; a literal `#rrggbb` is taken as a
//! custom color. Anything else resolves to the caller's fallback.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::CatalogError;

/// The three named color slots of a theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub id: String,
    pub name: Option<String>,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Theme {
    pub fn new(
        id: impl Into<String>,
        primary: impl Into<String>,
        secondary: impl Into<String>,
        accent: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            primary: primary.into(),
            secondary: secondary.into(),
            accent: accent.into(),
        }
    }

    /// Look up a theme slot by key
    pub fn slot(&self, key: &str) -> Option<&str> {
        match key {
            "primary" => Some(&self.primary),
            "secondary" => Some(&self.secondary),
            "accent" => Some(&self.accent),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        ThemeCatalog::default().resolve_or_default(DEFAULT_THEME_ID)
    }
}

/// Fixed neutral colors, selectable by id independently of the theme
pub const NEUTRAL_COLORS: &[(&str, &str)] = &[
    ("white", "#ffffff"),
    ("off-white", "#f8f7f4"),
    ("light-gray", "#e5e7eb"),
    ("gray", "#9ca3af"),
    ("slate", "#475569"),
    ("charcoal", "#1f2937"),
    ("black", "#000000"),
];

/// Look up a neutral color by id
pub fn neutral_color(id: &str) -> Option<&'static str> {
    NEUTRAL_COLORS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, hex)| *hex)
}

/// Resolve a color reference to a concrete color
///
/// Fallback order:
/// 1. Theme slot (`primary`, `secondary`, `accent`)
/// 2. Neutral palette id
/// 3. Literal hex color
/// 4. `fallback`
///
/// Total: always returns a usable color.
pub fn resolve_color(key: &str, theme: &Theme, fallback: &str) -> String {
    if let Some(color) = theme.slot(key) {
        return color.to_string();
    }
    if let Some(color) = neutral_color(key) {
        return color.to_string();
    }
    if Rgb::parse_hex(key).is_some() {
        return key.to_string();
    }
    fallback.to_string()
}

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb`
    pub fn parse_hex(value: &str) -> Option<Rgb> {
        let hex = value.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Rgb {
                    r: expand(0)?,
                    g: expand(1)?,
                    b: expand(2)?,
                })
            }
            6 => Some(Rgb {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            _ => None,
        }
    }

    /// Relative luminance (0.0 black to 1.0 white)
    pub fn luminance(&self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = channel as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

/// Pick `dark` or `light`, whichever reads better on `background`
///
/// Backgrounds that are not hex literals count as dark.
pub fn contrasting<'a>(background: &str, dark: &'a str, light: &'a str) -> &'a str {
    match Rgb::parse_hex(background) {
        Some(rgb) if rgb.luminance() > 0.4 => dark,
        _ => light,
    }
}

/// Format a color with an opacity (0.0 to 1.0) as `rgba(...)`
///
/// Colors that are not hex literals are returned unchanged.
pub fn with_opacity(color: &str, opacity: f64) -> String {
    match Rgb::parse_hex(color) {
        Some(rgb) => format!(
            "rgba({}, {}, {}, {:.2})",
            rgb.r,
            rgb.g,
            rgb.b,
            opacity.clamp(0.0, 1.0)
        ),
        None => color.to_string(),
    }
}

/// Id of the theme used when a document names none
pub const DEFAULT_THEME_ID: &str = "classic";

const DEFAULT_THEMES: &str = r##"
[themes.classic]
name = "Classic"
primary = "#1e3a5f"
secondary = "#f4f1ea"
accent = "#e07a5f"

[themes.ocean]
name = "Ocean"
primary = "#0f4c75"
secondary = "#bbe1fa"
accent = "#3282b8"

[themes.forest]
name = "Forest"
primary = "#2d4a3e"
secondary = "#e9f0e6"
accent = "#c9a227"

[themes.sunset]
name = "Sunset"
primary = "#6a2c70"
secondary = "#fde2e4"
accent = "#f08a5d"

[themes.mono]
name = "Monochrome"
primary = "#111111"
secondary = "#f5f5f5"
accent = "#777777"
"##;

/// TOML structure for deserializing theme catalogs
#[derive(Deserialize)]
struct TomlThemeCatalog {
    themes: BTreeMap<String, TomlTheme>,
}

#[derive(Deserialize)]
struct TomlTheme {
    name: Option<String>,
    primary: String,
    secondary: String,
    accent: String,
}

/// Theme lookup table keyed by id
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    pub themes: BTreeMap<String, Theme>,
}

impl ThemeCatalog {
    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a catalog from a TOML string
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlThemeCatalog = toml::from_str(content)?;
        let themes = parsed
            .themes
            .into_iter()
            .map(|(id, t)| {
                let theme = Theme {
                    id: id.clone(),
                    name: t.name,
                    primary: t.primary,
                    secondary: t.secondary,
                    accent: t.accent,
                };
                (id, theme)
            })
            .collect();
        Ok(Self { themes })
    }

    /// Add the themes of another catalog, replacing ids that already exist
    pub fn merge(mut self, other: ThemeCatalog) -> Self {
        self.themes.extend(other.themes);
        self
    }

    /// Look up a theme by id
    pub fn resolve(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    /// Look up a theme by id, falling back to the built-in default theme
    pub fn resolve_or_default(&self, id: &str) -> Theme {
        if let Some(theme) = self.resolve(id) {
            return theme.clone();
        }
        warn!("unknown theme '{}', using '{}'", id, DEFAULT_THEME_ID);
        self.themes
            .get(DEFAULT_THEME_ID)
            .cloned()
            .unwrap_or_else(builtin_default_theme)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(|k| k.as_str())
    }
}

fn builtin_default_theme() -> Theme {
    let mut theme = Theme::new(DEFAULT_THEME_ID, "#1e3a5f", "#f4f1ea", "#e07a5f");
    theme.name = Some("Classic".to_string());
    theme
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::from_str(DEFAULT_THEMES).expect("Default themes should be valid TOML")
    }
}
