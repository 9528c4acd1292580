use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{names, timing};
use crate::error::{LoadingError, LoadingErrorContext, LoadingResult};

/// Loading screen configuration
///
/// Read from a TOML file; every field falls back to the built-in default
/// when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingScreenConfig {
    /// Frame rate cap for presented loading frames
    pub target_fps: f32,

    /// Minimum milliseconds between wallpaper changes during the first load
    pub wallpaper_interval_ms: f64,

    /// Case-insensitive name prefix of wallpaper resources
    pub wallpaper_prefix: String,

    /// Resource group searched for wallpapers
    pub resource_group: String,

    /// Post-process stage whose output is frozen behind later loads
    pub final_compositor: String,

    /// Intermediate texture of `final_compositor` shown as background
    pub final_compositor_output: String,

    /// Seed for wallpaper selection; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for LoadingScreenConfig {
    fn default() -> Self {
        Self {
            target_fps: timing::DEFAULT_TARGET_FPS,
            wallpaper_interval_ms: timing::WALLPAPER_INTERVAL_MS,
            wallpaper_prefix: names::WALLPAPER_PREFIX.to_string(),
            resource_group: names::RESOURCE_GROUP.to_string(),
            final_compositor: names::FINAL_COMPOSITOR.to_string(),
            final_compositor_output: names::FINAL_COMPOSITOR_OUTPUT.to_string(),
            rng_seed: None,
        }
    }
}

impl LoadingScreenConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> LoadingResult<Self> {
        let config: Self = toml::from_str(source).config_context("parse loading screen config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> LoadingResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::info!("[LoadingScreen] Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> LoadingResult<String> {
        toml::to_string_pretty(self).config_context("serialize loading screen config")
    }

    pub fn validate(&self) -> LoadingResult<()> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(config_error(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        if !(self.wallpaper_interval_ms.is_finite() && self.wallpaper_interval_ms >= 0.0) {
            return Err(config_error(format!(
                "wallpaper_interval_ms must be non-negative, got {}",
                self.wallpaper_interval_ms
            )));
        }

        let names = [
            ("wallpaper_prefix", &self.wallpaper_prefix),
            ("resource_group", &self.resource_group),
            ("final_compositor", &self.final_compositor),
            ("final_compositor_output", &self.final_compositor_output),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(config_error(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }

    /// Milliseconds between two presented frames
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }
}

fn config_error(message: String) -> LoadingError {
    LoadingError::Config { message }
}
