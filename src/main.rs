//! Grid Composer CLI
//!
//! Usage:
//!   grid-composer [OPTIONS] [FILE]
//!
//! Options:
//!   --themes <FILE>         Extra themes (TOML format)
//!   --platforms <FILE>      Extra export platforms (TOML format)
//!   --presets <FILE>        Extra layout/style presets (TOML format)
//!   --layout-preset <ID>    Apply a layout preset
//!   --style-preset <ID>     Apply a style preset
//!   -p, --platform <ID>     Override the document's platform
//!   -i, --image <PATH>      Add an image to the pool and the first empty cell
//!   --lint                  Report composition defects
//!   -d, --debug             Print the scene tree to stderr as well
//!   -v, --verbose           Debug logging
//!   -h, --help              Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use clap::Parser;
use log::{debug, info};

use grid_composer::document::read_source;
use grid_composer::{
    build_scene, lint, load_document, ComposeConfig, ComposeError, DocumentState,
    ImagePoolEntry, PlatformCatalog, PresetRegistry, ThemeCatalog,
};

#[derive(Parser)]
#[command(name = "grid-composer")]
#[command(about = "Grid composition and style resolution for social images")]
struct Cli {
    /// Input document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Extra themes, merged over the built-in ones (TOML format)
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Extra export platforms, merged over the built-in ones (TOML format)
    #[arg(long)]
    platforms: Option<PathBuf>,

    /// Extra layout and style presets, merged over the built-in ones (TOML format)
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Apply a layout preset after loading
    #[arg(long)]
    layout_preset: Option<String>,

    /// Apply a style preset after loading
    #[arg(long)]
    style_preset: Option<String>,

    /// Override the document's export platform
    #[arg(short, long)]
    platform: Option<String>,

    /// Add an image file to the pool and show it in the first empty cell
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,

    /// Report composition defects on stderr
    #[arg(long)]
    lint: bool,

    /// Debug mode: also print the scene tree to stderr
    #[arg(short, long)]
    debug: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// List the available platforms and exit
    #[arg(long)]
    list_platforms: bool,

    /// List the available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// List the available presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let themes = load_catalog(&cli.themes, "themes", ThemeCatalog::from_file)
        .map_or_else(ThemeCatalog::default, |custom| ThemeCatalog::default().merge(custom));
    let platforms = load_catalog(&cli.platforms, "platforms", PlatformCatalog::from_file)
        .map_or_else(PlatformCatalog::default, |custom| {
            PlatformCatalog::default().merge(custom)
        });
    let presets = load_catalog(&cli.presets, "presets", PresetRegistry::from_file)
        .map_or_else(PresetRegistry::builtin, |custom| {
            PresetRegistry::builtin().merge(custom)
        });

    let config = ComposeConfig::new()
        .with_themes(themes)
        .with_platforms(platforms)
        .with_presets(presets)
        .with_debug(cli.debug)
        .with_lint(cli.lint);
    let config = match (&cli.layout_preset, &cli.style_preset) {
        (Some(layout), Some(style)) => config.with_layout_preset(layout).with_style_preset(style),
        (Some(layout), None) => config.with_layout_preset(layout),
        (None, Some(style)) => config.with_style_preset(style),
        (None, None) => config,
    };

    if cli.list_platforms || cli.list_themes || cli.list_presets {
        print_catalogs(&cli, &config);
        return;
    }

    // No input file and an interactive stdin: show a short intro instead of blocking
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let (source, filename) = read_input(&cli.input);

    let mut doc = match load_document(&source, &config) {
        Ok(doc) => doc,
        Err(ComposeError::Document(e)) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(id) = &cli.platform {
        match config.platforms.resolve(id) {
            Some(platform) => doc.dimensions = platform.dimensions,
            None => {
                eprintln!("Error: unknown platform '{}' (see --list-platforms)", id);
                std::process::exit(1);
            }
        }
    }

    for path in &cli.images {
        if let Err(e) = add_image_file(&mut doc, path) {
            eprintln!("Error reading image '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }

    let scene = build_scene(&doc);
    let tree = scene.describe();

    if config.debug {
        eprintln!("=== Scene Debug ===");
        eprint!("{}", tree);
        eprintln!("===================");
    }

    if config.lint {
        for warning in lint::check(&doc, &scene) {
            eprintln!("warning[{}]: {}", warning.category, warning.message);
        }
    }

    print!("{}", tree);
}

fn load_catalog<T, E: std::fmt::Display>(
    path: &Option<PathBuf>,
    what: &str,
    load: impl Fn(&Path) -> Result<T, E>,
) -> Option<T> {
    let path = path.as_ref()?;
    match load(path) {
        Ok(catalog) => {
            info!("loaded {} from {}", what, path.display());
            Some(catalog)
        }
        Err(e) => {
            eprintln!("Error loading {} '{}': {}", what, path.display(), e);
            std::process::exit(1);
        }
    }
}

fn read_input(input: &Option<PathBuf>) -> (String, String) {
    match input {
        Some(path) => match read_source(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error: {} ('{}')", e, path.display());
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Embed an image file as a `data:` URL and show it in the first empty cell
fn add_image_file(doc: &mut DocumentState, path: &Path) -> io::Result<()> {
    let bytes = fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    let src = format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(&bytes));

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let id = (doc.images.len() + 1..)
        .map(|n| format!("img-{}", n))
        .find(|id| doc.image(id).is_none())
        .unwrap_or_else(|| "img".to_string());
    doc.add_image(ImagePoolEntry::new(id.clone(), src).with_name(name));

    match doc.first_empty_cell() {
        Some(cell) => {
            doc.assign_image(cell, Some(&id));
            debug!("assigned {} to cell {}", id, cell);
        }
        None => debug!("no empty cell for {}, kept in the pool only", id),
    }
    Ok(())
}

fn print_catalogs(cli: &Cli, config: &ComposeConfig) {
    if cli.list_platforms {
        println!("PLATFORMS");
        for platform in config.platforms.iter() {
            println!(
                "  {:<22} {:>4}x{:<4} {}",
                platform.id,
                platform.dimensions.width,
                platform.dimensions.height,
                platform.name.as_deref().unwrap_or("")
            );
        }
    }
    if cli.list_themes {
        println!("THEMES");
        for theme in config.themes.themes.values() {
            println!(
                "  {:<12} {} {} {}  {}",
                theme.id,
                theme.primary,
                theme.secondary,
                theme.accent,
                theme.name.as_deref().unwrap_or("")
            );
        }
    }
    if cli.list_presets {
        println!("LAYOUT PRESETS");
        for id in config.presets.layout_ids() {
            println!("  {}", id);
        }
        println!("STYLE PRESETS");
        for id in config.presets.style_ids() {
            println!("  {}", id);
        }
    }
}

fn print_intro() {
    println!(
        r#"Grid Composer - grid composition and style resolution for social images

USAGE:
    grid-composer [OPTIONS] [FILE]
    cat post.toml | grid-composer

QUICK START:
    printf '[layout]\ntype = "rows"\nstructure = [{{ size = 60 }}, {{ size = 40 }}]\n' \
        | grid-composer --image photo.jpg

This prints the resolved scene: one line per cell, image, overlay and text run.
Run --help for all options, --list-presets for ready-made layouts."#
    );
}
