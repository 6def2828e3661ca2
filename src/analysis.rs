use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::{Classification, Severity, classify};
use crate::config::{GarbhaConfig, OverlayConfig};
use crate::error::GarbhaError;
use crate::measurement::{Measurement, ThicknessGauge};
use crate::segmentation::render_overlay;

/// Image types accepted for upload.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Checks that `path` names a supported image type.
///
/// Only the extension is inspected; the decoder sniffs the actual format.
pub fn validate_upload(path: &Path) -> Result<(), GarbhaError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(GarbhaError::UnsupportedFormat(path.display().to_string()));
    }

    Ok(())
}

/// Where the overlay of a run is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayTarget {
    Skip,
    /// `<stem>_segmented.png` under the output dir or next to the source.
    Default,
    Path(PathBuf),
}

impl OverlayTarget {
    pub fn from_flags(no_overlay: bool, output: Option<PathBuf>) -> Self {
        match (no_overlay, output) {
            (true, _) => OverlayTarget::Skip,
            (false, Some(path)) => OverlayTarget::Path(path),
            (false, None) => OverlayTarget::Default,
        }
    }
}

/// Result of one analysis run. Owned by the caller; nothing is cached.
pub struct Analysis {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub measurement: Measurement,
    pub overlay: RgbImage,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl Analysis {
    pub fn classification(&self) -> Classification {
        classify(Some(self.measurement.thickness_mm))
    }

    /// Where the overlay goes when no explicit path is given:
    /// `<dir>/<stem>_segmented.png`, with `dir` defaulting to the source's.
    pub fn default_overlay_path(&self, output_dir: Option<&Path>) -> PathBuf {
        let stem = self
            .source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scan");
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| self.source.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(format!("{stem}_segmented.png"))
    }

    pub fn save_overlay(&self, path: &Path) -> Result<(), GarbhaError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        self.overlay.save(path)?;
        info!(path = %path.display(), "wrote segmentation overlay");
        Ok(())
    }

    /// Writes the overlay and, when `report` is set, the JSON report.
    /// Returns the report record either way.
    pub fn persist(
        &self,
        overlay: &OverlayTarget,
        output_dir: Option<&Path>,
        report: Option<&Path>,
    ) -> Result<AnalysisReport, GarbhaError> {
        let overlay_path = match overlay {
            OverlayTarget::Skip => None,
            OverlayTarget::Default => Some(self.default_overlay_path(output_dir)),
            OverlayTarget::Path(path) => Some(path.clone()),
        };
        if let Some(path) = &overlay_path {
            self.save_overlay(path)?;
        }

        let record = AnalysisReport::from_analysis(self, overlay_path.as_deref());
        if let Some(path) = report {
            record.write_to(path)?;
        }
        Ok(record)
    }
}

/// Runs the simulated segmentation and measurement over an uploaded image.
pub struct Analyzer {
    processing_delay: Duration,
    overlay: OverlayConfig,
}

impl Analyzer {
    pub fn new(config: &GarbhaConfig) -> Self {
        Self {
            processing_delay: Duration::from_millis(config.processing_delay_ms),
            overlay: config.overlay,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Decodes `path`, measures it with `gauge` and renders the overlay.
    ///
    /// Any failure returns an error and no partial result.
    pub fn run(&self, path: &Path, gauge: &mut impl ThicknessGauge) -> Result<Analysis, GarbhaError> {
        validate_upload(path)?;
        let started_at = Utc::now();
        let clock = Instant::now();

        let reader = image::ImageReader::open(path)?.with_guessed_format()?;
        debug!(format = ?reader.format(), "decoding upload");
        let image = reader.decode()?.to_rgb8();
        let (width, height) = image.dimensions();
        debug!(width, height, "decoded image");

        if !self.processing_delay.is_zero() {
            std::thread::sleep(self.processing_delay);
        }

        let measurement = gauge.measure(&image);
        info!(thickness_mm = measurement.thickness_mm, "measured endometrium");

        let overlay = render_overlay(&image, &self.overlay);

        Ok(Analysis {
            source: path.to_path_buf(),
            width,
            height,
            measurement,
            overlay,
            started_at,
            elapsed: clock.elapsed(),
        })
    }
}

/// Structured record of a completed analysis, suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub source: PathBuf,
    pub overlay: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub thickness_mm: f64,
    pub label: String,
    pub severity: Severity,
    pub color: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl AnalysisReport {
    pub fn from_analysis(analysis: &Analysis, overlay: Option<&Path>) -> Self {
        let classification = analysis.classification();
        Self {
            id: Uuid::new_v4(),
            source: analysis.source.clone(),
            overlay: overlay.map(Path::to_path_buf),
            width: analysis.width,
            height: analysis.height,
            thickness_mm: analysis.measurement.thickness_mm,
            label: classification.label.to_string(),
            severity: classification.severity,
            color: classification.severity.color().map(str::to_string),
            analyzed_at: analysis.started_at,
            duration_ms: u64::try_from(analysis.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn to_json(&self) -> Result<String, GarbhaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), GarbhaError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "wrote analysis report");
        Ok(())
    }
}
