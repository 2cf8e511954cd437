//! Configuration file support for matching-scenes
//!
//! Handles `.matching.toml` files that set how scenes are styled and reported.
//! Style values are handed to whoever draws the graph; they never change
//! matching semantics.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .matching.toml
//!
//! [style]
//! # Multiplier for dot radius, stroke width and dash length
//! scale = 1.0
//!
//! # Color of matched (solid) and unmatched (dashed) edges
//! solid_color = "WHITE"
//! dashed_color = "WHITE"
//!
//! [report]
//! # List the full matching after every frame, not only the changes
//! list_matching = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid scale {0}: must be a positive number")]
    InvalidScale(f64),
}

/// Drawing style section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StyleConfig {
    /// Multiplier applied to dot radius, stroke width and dash length
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Color of solid lines (matched edges)
    #[serde(default = "default_color")]
    pub solid_color: String,

    /// Color of dashed lines (unmatched edges)
    #[serde(default = "default_color")]
    pub dashed_color: String,
}

fn default_scale() -> f64 {
    1.0
}

fn default_color() -> String {
    "WHITE".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            solid_color: default_color(),
            dashed_color: default_color(),
        }
    }
}

impl StyleConfig {
    /// Dot radius at this scale
    pub fn dot_radius(&self) -> f64 {
        0.15 * self.scale
    }

    /// Stroke width of edge lines at this scale
    pub fn stroke_width(&self) -> f64 {
        10.0 * self.scale
    }

    /// Dash length of unmatched edges at this scale
    pub fn dash_length(&self) -> f64 {
        0.1 * self.scale
    }
}

/// Report section
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    /// List every matched edge after each frame
    #[serde(default)]
    pub list_matching: bool,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl SceneConfig {
    /// Parse and validate a configuration document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.style.scale.is_finite() && self.style.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.style.scale));
        }
        Ok(())
    }
}

/// Load configuration for a scene
///
/// Searches for `.matching.toml` in the given directory and parent
/// directories; defaults apply when none is found.
pub fn load_config(start_path: &Path) -> Result<SceneConfig, ConfigError> {
    match find_config_file(start_path) {
        Some(path) => load_config_file(&path),
        None => Ok(SceneConfig::default()),
    }
}

/// Load a specific configuration file
pub fn load_config_file(path: &Path) -> Result<SceneConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    SceneConfig::from_toml(&content)
}

/// Find the config file by searching up the directory tree
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".matching.toml", "matching.toml"];

    let mut current = if start_path.is_file() {
        start_path.parent()?.to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    None
}
