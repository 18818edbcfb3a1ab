//! Tag configuration module.
//!
//! Handles loading and validating the two config namespaces the pipeline
//! consumes, plus the parallelism knob for the thumbnail pass:
//!
//! ```toml
//! [gallerytag]
//! url = "/images"        # Base URL for full-size images (required)
//! columns = 4            # Layout hint for gallery grids
//! thumb_width = 100      # Thumbnail dimensions
//! thumb_height = 100
//!
//! [processing]
//! max_workers = 4        # Max parallel thumbnail workers (omit for auto = CPU cores)
//!
//! [series.rust-intro]    # Free-form per-series tables, keyed by series id
//! title = "Rust from scratch"
//! ```
//!
//! Config files are sparse — only `gallerytag.url` is required, everything
//! else has a default. Unrecognized keys are ignored rather than rejected:
//! the host's site config usually carries plenty of sections this crate
//! has no business validating. Validation runs once at load time, not per
//! render.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Missing required config value: {0}")]
    Missing(&'static str),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The `[gallerytag]` namespace: gallery rendering and thumbnail sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base URL prefix for full-size images. Required — an empty value
    /// fails validation with [`ConfigError::Missing`].
    pub url: String,
    /// Layout hint for gallery grids. Parsed and validated, but the
    /// trailing clear-fix marker is governed by a fixed row width of 4;
    /// see DESIGN.md.
    pub columns: u32,
    /// Thumbnail target width in pixels.
    pub thumb_width: u32,
    /// Thumbnail target height in pixels.
    pub thumb_height: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            columns: 4,
            thumb_width: 100,
            thumb_height: 100,
        }
    }
}

impl GalleryConfig {
    /// Validate config values. Called once at load; renderers also call
    /// it so a hand-built config fails the affected tag, not the build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Missing("gallerytag.url"));
        }
        if self.thumb_width == 0 || self.thumb_height == 0 {
            return Err(ConfigError::Validation(
                "gallerytag.thumb_width and thumb_height must be non-zero".into(),
            ));
        }
        if self.columns == 0 {
            return Err(ConfigError::Validation(
                "gallerytag.columns must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Target thumbnail dimensions as `(width, height)`.
    pub fn thumb_size(&self) -> (u32, u32) {
        (self.thumb_width, self.thumb_height)
    }
}

/// The `[series]` namespace: per-series tables keyed by series id.
///
/// The shape of each table is up to the host — this crate only looks
/// series ids up, it never interprets the values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesRegistry(BTreeMap<String, toml::Value>);

impl SeriesRegistry {
    pub fn get(&self, series_id: &str) -> Option<&toml::Value> {
        self.0.get(series_id)
    }

    pub fn contains(&self, series_id: &str) -> bool {
        self.0.contains_key(series_id)
    }

    /// Registered series ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parallel processing settings for the thumbnail pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// All config this crate reads, in one struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteTagConfig {
    pub gallerytag: GalleryConfig,
    pub processing: ProcessingConfig,
    pub series: SeriesRegistry,
}

impl SiteTagConfig {
    /// Parse and validate from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.gallerytag.validate()?;
        Ok(config)
    }

    /// Load and validate from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
