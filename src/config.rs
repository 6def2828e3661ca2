//! Configuration loaded from `garbha.toml`.
//!
//! [`GarbhaConfig`] holds every tunable of an analysis run. Missing fields
//! fall back to defaults. `GARBHA_OUTPUT_DIR` and `GARBHA_DELAY_MS` take
//! precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::GarbhaError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "garbha.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GarbhaConfig {
    /// Simulated processing time before results are shown.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,

    /// Directory for overlay images. Defaults to the source image's directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub measurement: MeasurementConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Range of the simulated thickness draw.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MeasurementConfig {
    #[serde(default = "default_min_mm")]
    pub min_mm: f64,

    #[serde(default = "default_max_mm")]
    pub max_mm: f64,
}

/// Appearance of the mock segmentation overlay.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverlayConfig {
    /// Factor applied to every channel before the mask is painted.
    #[serde(default = "default_darken")]
    pub darken: f64,

    /// RGB color of the central mask.
    #[serde(default = "default_mask_color")]
    pub mask_color: [u8; 3],
}

fn default_processing_delay_ms() -> u64 {
    2000
}

fn default_min_mm() -> f64 {
    6.5
}

fn default_max_mm() -> f64 {
    12.5
}

fn default_darken() -> f64 {
    0.7
}

fn default_mask_color() -> [u8; 3] {
    [255, 50, 50]
}

impl Default for GarbhaConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
            output_dir: None,
            measurement: MeasurementConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            min_mm: default_min_mm(),
            max_mm: default_max_mm(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            darken: default_darken(),
            mask_color: default_mask_color(),
        }
    }
}

impl MeasurementConfig {
    /// Rejects bounds the gauge cannot sample from.
    pub fn validate(&self) -> Result<(), GarbhaError> {
        if !self.min_mm.is_finite() || !self.max_mm.is_finite() {
            return Err(GarbhaError::Config(format!(
                "measurement bounds must be finite (got {}..{})",
                self.min_mm, self.max_mm
            )));
        }
        if self.min_mm > self.max_mm {
            return Err(GarbhaError::InvalidRange {
                min: self.min_mm,
                max: self.max_mm,
            });
        }
        // The sampler needs a representable span.
        if !(self.max_mm - self.min_mm).is_finite() {
            return Err(GarbhaError::Config(format!(
                "measurement range is too wide (got {}..{})",
                self.min_mm, self.max_mm
            )));
        }
        Ok(())
    }
}

impl OverlayConfig {
    pub fn validate(&self) -> Result<(), GarbhaError> {
        if !(0.0..=1.0).contains(&self.darken) {
            return Err(GarbhaError::Config(format!(
                "overlay.darken must be within 0.0..=1.0 (got {})",
                self.darken
            )));
        }
        Ok(())
    }
}

impl GarbhaConfig {
    /// Loads `garbha.toml` from the working directory, or `path` when given.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    debug!("no {CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Command line flags take precedence over the environment and the file.
    pub fn apply_cli(&mut self, delay_ms: Option<u64>) {
        if let Some(delay_ms) = delay_ms {
            self.processing_delay_ms = delay_ms;
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str::<GarbhaConfig>(&contents).map_err(GarbhaError::from)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Environment variables take precedence over the config file.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup("GARBHA_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(delay) = lookup("GARBHA_DELAY_MS").filter(|v| !v.is_empty()) {
            self.processing_delay_ms = delay.trim().parse().map_err(|_| {
                GarbhaError::Config(format!("GARBHA_DELAY_MS is not a number: {delay}"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GarbhaError> {
        self.measurement.validate()?;
        self.overlay.validate()
    }
}
