//! Stage configuration (stagehand.toml)
//!
//! Every section and field is optional; missing values take the built-in
//! defaults. Values that cannot work (a zero tick rate, a non-positive scale)
//! are replaced when the configuration is applied, never rejected.

use serde::{Deserialize, Serialize};
use stagehand_animation::AnimationDefaults;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TICK_RATE: u32 = 30;
pub const DEFAULT_UNIT_SCALE: f64 = 100.0;
pub const DEFAULT_REFERENCE_SCALE: f64 = 5.0;
pub const DEFAULT_PORTRAIT_THRESHOLD: f64 = 1.2;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level stage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StageConfig {
    pub scheduler: SchedulerConfig,
    pub animation: AnimationDefaults,
    pub surface: SurfaceConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl StageConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded stage config");
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replace unusable values with defaults
    pub fn sanitized(self) -> Self {
        Self {
            scheduler: self.scheduler.sanitized(),
            animation: self.animation.sanitized(),
            surface: self.surface.sanitized(),
            diagnostics: self.diagnostics,
        }
    }
}

/// Frame scheduler configuration
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target ticks per second
    pub tick_rate: u32,
    /// Start with the simulation clock frozen
    pub start_paused: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            start_paused: false,
        }
    }
}

impl SchedulerConfig {
    pub fn sanitized(self) -> Self {
        let tick_rate = if self.tick_rate == 0 {
            tracing::warn!(fallback = DEFAULT_TICK_RATE, "tick_rate must be positive; using default");
            DEFAULT_TICK_RATE
        } else {
            self.tick_rate
        };
        Self { tick_rate, ..self }
    }
}

/// Rendering surface and coordinate transform configuration
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Device pixels per logical unit at scale 1
    pub unit_scale: f64,
    /// Scale at which scale-cancelled sizes render 1:1
    pub reference_scale: f64,
    /// Width/height ratio under which the surface counts as portrait
    pub portrait_threshold: f64,
    /// Initial layout width in host pixels
    pub width: f64,
    /// Initial layout height in host pixels
    pub height: f64,
    /// Initial device pixel ratio
    pub device_pixel_ratio: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            unit_scale: DEFAULT_UNIT_SCALE,
            reference_scale: DEFAULT_REFERENCE_SCALE,
            portrait_threshold: DEFAULT_PORTRAIT_THRESHOLD,
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl SurfaceConfig {
    pub fn sanitized(self) -> Self {
        Self {
            unit_scale: positive_or("unit_scale", self.unit_scale, DEFAULT_UNIT_SCALE),
            reference_scale: positive_or(
                "reference_scale",
                self.reference_scale,
                DEFAULT_REFERENCE_SCALE,
            ),
            portrait_threshold: positive_or(
                "portrait_threshold",
                self.portrait_threshold,
                DEFAULT_PORTRAIT_THRESHOLD,
            ),
            width: non_negative_or("width", self.width),
            height: non_negative_or("height", self.height),
            device_pixel_ratio: positive_or("device_pixel_ratio", self.device_pixel_ratio, 1.0),
        }
    }
}

/// Diagnostics overlay configuration
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Collect per-frame diagnostic lines and flush them every tick
    pub enabled: bool,
}

fn positive_or(field: &str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(field, value, fallback, "surface option must be positive; using default");
        fallback
    }
}

fn non_negative_or(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(field, value, "surface size must be non-negative; using 0");
        0.0
    }
}
