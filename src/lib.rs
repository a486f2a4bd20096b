//! Grid Composer - grid composition and style resolution for social images
//!
//! This library turns a composition document (a grid layout, an image pool,
//! text layers and styling) into a fully resolved [`Scene`]: pixel geometry,
//! concrete colors, overlay stacks and positioned text for every cell.
//!
//! # Example
//!
//! ```rust
//! use grid_composer::compose;
//!
//! let scene = compose(r#"
//!     [layout]
//!     type = "rows"
//!     structure = [{ size = 60 }, { size = 40 }]
//!
//!     [text.body_text]
//!     content = "Hello"
//! "#).unwrap();
//!
//! assert_eq!(scene.cells.len(), 2);
//! assert!(scene.describe().contains("Hello"));
//! ```

pub mod content;
pub mod document;
pub mod error;
pub mod layout;
pub mod lint;
pub mod overlay;
pub mod platform;
pub mod preset;
pub mod scene;
pub mod style;

pub use content::{assign_content, CellContent, TextPlacement};
pub use document::{parse_document, DocumentState, ImagePoolEntry, TextKind, TextLayer};
pub use error::{CatalogError, DocumentError};
pub use layout::{resolve_cells, Cell, Layout, LayoutConfig, LayoutError, LayoutType, Section};
pub use lint::{LintCategory, LintWarning};
pub use platform::{Dimensions, PlatformCatalog};
pub use preset::PresetRegistry;
pub use scene::{build_scene, Scene, SceneCell};
pub use style::{Theme, ThemeCatalog};

use thiserror::Error;

/// Errors that can occur during the compose pipeline
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Error loading the document
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Error applying a preset
    #[error("preset error: {0}")]
    Preset(#[from] CatalogError),
}

/// Configuration for the complete compose pipeline
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Size limits for layout structures
    pub layout: LayoutConfig,
    /// Themes documents can refer to by id
    pub themes: ThemeCatalog,
    /// Export platforms documents can refer to by id
    pub platforms: PlatformCatalog,
    /// Layout and style presets
    pub presets: PresetRegistry,
    /// Layout preset applied after loading
    pub layout_preset: Option<String>,
    /// Style preset applied after loading
    pub style_preset: Option<String>,
    /// Debug mode: print the resolved scene tree to stderr
    pub debug: bool,
    /// Run lint checks on the built scene
    pub lint: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            themes: ThemeCatalog::default(),
            platforms: PlatformCatalog::default(),
            presets: PresetRegistry::builtin(),
            layout_preset: None,
            style_preset: None,
            debug: false,
            lint: false,
        }
    }
}

impl ComposeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the theme catalog
    pub fn with_themes(mut self, themes: ThemeCatalog) -> Self {
        self.themes = themes;
        self
    }

    /// Set the platform catalog
    pub fn with_platforms(mut self, platforms: PlatformCatalog) -> Self {
        self.platforms = platforms;
        self
    }

    /// Set the preset registry
    pub fn with_presets(mut self, presets: PresetRegistry) -> Self {
        self.presets = presets;
        self
    }

    /// Apply a layout preset after loading
    pub fn with_layout_preset(mut self, id: impl Into<String>) -> Self {
        self.layout_preset = Some(id.into());
        self
    }

    /// Apply a style preset after loading
    pub fn with_style_preset(mut self, id: impl Into<String>) -> Self {
        self.style_preset = Some(id.into());
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable lint checks
    pub fn with_lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }
}

/// Compose a TOML document into a scene with default configuration
///
/// # Example
///
/// ```rust
/// use grid_composer::compose;
///
/// let scene = compose(r#"platform = "instagram-story""#).unwrap();
/// assert_eq!((scene.width, scene.height), (1080, 1920));
/// assert_eq!(scene.cells.len(), 1);
/// ```
pub fn compose(source: &str) -> Result<Scene, ComposeError> {
    compose_with_config(source, &ComposeConfig::default())
}

/// Compose a TOML document into a scene with custom configuration
pub fn compose_with_config(source: &str, config: &ComposeConfig) -> Result<Scene, ComposeError> {
    compose_with_lint(source, config).map(|(scene, _)| scene)
}

/// Compose a document and run lint checks when `config.lint` is set
pub fn compose_with_lint(
    source: &str,
    config: &ComposeConfig,
) -> Result<(Scene, Vec<LintWarning>), ComposeError> {
    let doc = load_document(source, config)?;
    let scene = build_scene(&doc);

    if config.debug {
        eprintln!("=== Scene Debug ===");
        eprint!("{}", scene.describe());
        eprintln!("===================");
    }

    let warnings = if config.lint {
        lint::check(&doc, &scene)
    } else {
        Vec::new()
    };

    Ok((scene, warnings))
}

/// Parse a document and apply the configured presets
pub fn load_document(source: &str, config: &ComposeConfig) -> Result<DocumentState, ComposeError> {
    let mut doc = parse_document(source, config)?;
    if let Some(id) = &config.layout_preset {
        config.presets.apply_layout(&mut doc, id, &config.layout)?;
    }
    if let Some(id) = &config.style_preset {
        config.presets.apply_style(&mut doc, id, &config.themes)?;
    }
    Ok(doc)
}
