//! Endometrial thickness measurement.
//!
//! There is no trained model behind [`SimulatedGauge`]: it draws a plausible
//! thickness uniformly from the configured range. Anything implementing
//! [`ThicknessGauge`] can replace it without touching the rest of the flow.

use image::RgbImage;
use rand::distr::Uniform;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::MeasurementConfig;
use crate::error::GarbhaError;

/// A single thickness reading in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub thickness_mm: f64,
}

impl Measurement {
    /// Creates a reading rounded to two decimals, the precision a simulated
    /// draw is reported with.
    pub fn rounded(thickness_mm: f64) -> Self {
        Self {
            thickness_mm: round_to_hundredths(thickness_mm),
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Produces a thickness reading from an ultrasound frame.
pub trait ThicknessGauge {
    fn measure(&mut self, image: &RgbImage) -> Measurement;
}

/// Random stand-in for a segmentation model.
pub struct SimulatedGauge<R> {
    rng: R,
    range: Uniform<f64>,
}

impl SimulatedGauge<ThreadRng> {
    pub fn from_entropy(config: &MeasurementConfig) -> Result<Self, GarbhaError> {
        Self::with_rng(rand::rng(), config)
    }
}

impl SimulatedGauge<StdRng> {
    /// Reproducible gauge; the same seed yields the same sequence of readings.
    pub fn seeded(seed: u64, config: &MeasurementConfig) -> Result<Self, GarbhaError> {
        Self::with_rng(StdRng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> SimulatedGauge<R> {
    pub fn with_rng(rng: R, config: &MeasurementConfig) -> Result<Self, GarbhaError> {
        config.validate()?;
        let range = Uniform::new_inclusive(config.min_mm, config.max_mm).map_err(|e| {
            GarbhaError::Config(format!(
                "cannot sample {}..={} mm: {e}",
                config.min_mm, config.max_mm
            ))
        })?;
        Ok(Self { rng, range })
    }
}

impl<R: Rng> ThicknessGauge for SimulatedGauge<R> {
    fn measure(&mut self, _image: &RgbImage) -> Measurement {
        let raw = self.rng.sample(&self.range);
        Measurement::rounded(raw)
    }
}

/// Always reports the same thickness, exactly as given. Used by
/// `--thickness` and in tests.
pub struct FixedGauge(pub f64);

impl ThicknessGauge for FixedGauge {
    fn measure(&mut self, _image: &RgbImage) -> Measurement {
        Measurement {
            thickness_mm: self.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> RgbImage {
        RgbImage::new(4, 4)
    }

    #[test]
    fn readings_are_rounded_to_hundredths() {
        assert_eq!(Measurement::rounded(8.456).thickness_mm, 8.46);
        assert_eq!(Measurement::rounded(8.454).thickness_mm, 8.45);
        assert_eq!(Measurement::rounded(9.0).thickness_mm, 9.0);
    }

    #[test]
    fn simulated_readings_stay_in_range() {
        let config = MeasurementConfig::default();
        let mut gauge = SimulatedGauge::seeded(7, &config).unwrap();
        let image = frame();
        for _ in 0..1000 {
            let m = gauge.measure(&image);
            assert!(m.thickness_mm >= 6.5 && m.thickness_mm <= 12.5, "{m:?}");
            let scaled = m.thickness_mm * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{m:?}");
        }
    }

    #[test]
    fn same_seed_same_readings() {
        let config = MeasurementConfig::default();
        let image = frame();
        let mut a = SimulatedGauge::seeded(42, &config).unwrap();
        let mut b = SimulatedGauge::seeded(42, &config).unwrap();
        for _ in 0..10 {
            assert_eq!(a.measure(&image), b.measure(&image));
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let config = MeasurementConfig {
            min_mm: 10.0,
            max_mm: 10.0,
        };
        let mut gauge = SimulatedGauge::seeded(1, &config).unwrap();
        assert_eq!(gauge.measure(&frame()).thickness_mm, 10.0);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = MeasurementConfig {
            min_mm: 12.0,
            max_mm: 6.0,
        };
        assert!(SimulatedGauge::seeded(1, &config).is_err());
    }

    #[test]
    fn fixed_gauge_reports_its_value() {
        let mut gauge = FixedGauge(7.0);
        assert_eq!(gauge.measure(&frame()).thickness_mm, 7.0);
    }

    #[test]
    fn fixed_gauge_does_not_round() {
        for t in [8.999, 7.004, 15.004] {
            assert_eq!(FixedGauge(t).measure(&frame()).thickness_mm, t);
        }
    }

    #[test]
    fn overflowing_span_is_rejected() {
        let config = MeasurementConfig {
            min_mm: -1.7e308,
            max_mm: 1.7e308,
        };
        assert!(SimulatedGauge::seeded(1, &config).is_err());
    }
}
