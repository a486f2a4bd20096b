//! Export platform catalog: platform id → canvas dimensions

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::CatalogError;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Length of the shorter side
    pub fn short_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1080, 1080)
    }
}

/// A named export target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub id: String,
    pub name: Option<String>,
    pub dimensions: Dimensions,
}

/// Id of the platform used when a document names none
pub const DEFAULT_PLATFORM_ID: &str = "instagram-square";

const DEFAULT_PLATFORMS: &str = r##"
[platforms.instagram-square]
name = "Instagram Post (Square)"
width = 1080
height = 1080

[platforms.instagram-portrait]
name = "Instagram Post (Portrait)"
width = 1080
height = 1350

[platforms.instagram-story]
name = "Instagram Story"
width = 1080
height = 1920

[platforms.facebook-post]
name = "Facebook Post"
width = 1200
height = 630

[platforms.twitter-post]
name = "X / Twitter Post"
width = 1600
height = 900

[platforms.linkedin-post]
name = "LinkedIn Post"
width = 1200
height = 627

[platforms.pinterest-pin]
name = "Pinterest Pin"
width = 1000
height = 1500

[platforms.youtube-thumbnail]
name = "YouTube Thumbnail"
width = 1280
height = 720
"##;

#[derive(Deserialize)]
struct TomlPlatformCatalog {
    platforms: BTreeMap<String, TomlPlatform>,
}

#[derive(Deserialize)]
struct TomlPlatform {
    name: Option<String>,
    width: u32,
    height: u32,
}

/// Platform lookup table keyed by id
#[derive(Debug, Clone)]
pub struct PlatformCatalog {
    pub platforms: BTreeMap<String, Platform>,
}

impl PlatformCatalog {
    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a catalog from a TOML string
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlPlatformCatalog = toml::from_str(content)?;
        let platforms = parsed
            .platforms
            .into_iter()
            .map(|(id, p)| {
                let platform = Platform {
                    id: id.clone(),
                    name: p.name,
                    dimensions: Dimensions::new(p.width, p.height),
                };
                (id, platform)
            })
            .collect();
        Ok(Self { platforms })
    }

    /// Add the platforms of another catalog, replacing ids that already exist
    pub fn merge(mut self, other: PlatformCatalog) -> Self {
        self.platforms.extend(other.platforms);
        self
    }

    pub fn resolve(&self, id: &str) -> Option<&Platform> {
        self.platforms.get(id)
    }

    /// Dimensions for a platform id, falling back to the default platform
    pub fn dimensions_or_default(&self, id: &str) -> Dimensions {
        if let Some(platform) = self.resolve(id) {
            return platform.dimensions;
        }
        warn!("unknown platform '{}', using '{}'", id, DEFAULT_PLATFORM_ID);
        self.resolve(DEFAULT_PLATFORM_ID)
            .map(|p| p.dimensions)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.values()
    }
}

impl Default for PlatformCatalog {
    fn default() -> Self {
        Self::from_str(DEFAULT_PLATFORMS).expect("Default platforms should be valid TOML")
    }
}
