use std::path::Path;

use serde::Deserialize;

use crate::error::SensorError;

/// Raw ADC value read from the IIO channel (12-bit, 0-4095 by default)
pub type RawSample = u32;

/// Luminosity as a whole percentage, 0 = dark, 100 = bright
pub type Percent = u8;

/// LDR resistance in full light (ohms)
pub const DEFAULT_BRIGHT_RESISTANCE: f64 = 146_000.0;
/// LDR resistance in darkness (ohms)
pub const DEFAULT_DARK_RESISTANCE: f64 = 5_000_000.0;
/// Full-scale ADC reading (12-bit)
pub const DEFAULT_ADC_MAX: f64 = 4095.0;
/// Fixed resistor of the voltage divider (ohms)
pub const DEFAULT_FIXED_RESISTANCE: f64 = 10_000.0;

/// Calibration curve of the LDR voltage divider
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub bright_resistance: f64,
    pub dark_resistance: f64,
    pub adc_max: f64,
    pub fixed_resistance: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            bright_resistance: DEFAULT_BRIGHT_RESISTANCE,
            dark_resistance: DEFAULT_DARK_RESISTANCE,
            adc_max: DEFAULT_ADC_MAX,
            fixed_resistance: DEFAULT_FIXED_RESISTANCE,
        }
    }
}

impl Calibration {
    /// Load a calibration from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self, SensorError> {
        let contents = std::fs::read_to_string(path)?;
        let calibration: Calibration = toml::from_str(&contents)?;
        Ok(calibration)
    }

    /// Check that the curve is usable before the loop starts
    pub fn validate(&self) -> Result<(), SensorError> {
        let values = [
            ("bright_resistance", self.bright_resistance),
            ("dark_resistance", self.dark_resistance),
            ("adc_max", self.adc_max),
            ("fixed_resistance", self.fixed_resistance),
        ];

        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(SensorError::Calibration(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.dark_resistance <= self.bright_resistance {
            return Err(SensorError::Calibration(format!(
                "dark_resistance ({}) must be greater than bright_resistance ({})",
                self.dark_resistance, self.bright_resistance
            )));
        }

        Ok(())
    }
}

/// Converts raw divider samples into a luminosity percentage
///
/// The LDR resistance is recovered from the divider relation
/// `R = R_fixed * (ADC_MAX - raw) / raw` and mapped linearly in log space,
/// `ln(R_dark)` being 0 % and `ln(R_bright)` being 100 %.
#[derive(Debug, Clone)]
pub struct LuminosityEstimator {
    calibration: Calibration,
}

impl LuminosityEstimator {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Resistance implied by a raw sample
    ///
    /// Returns `None` for a zero sample, where the divider is open and the
    /// resistance is unbounded.
    pub fn implied_resistance(&self, raw: RawSample) -> Option<f64> {
        if raw == 0 {
            return None;
        }
        let raw = f64::from(raw).min(self.calibration.adc_max);
        Some(self.calibration.fixed_resistance * (self.calibration.adc_max - raw) / raw)
    }

    /// Luminosity percentage for a raw sample
    ///
    /// A zero sample reads as fully dark and a sample at or above `adc_max`
    /// as fully bright.
    pub fn compute_percent(&self, raw: RawSample) -> Percent {
        match self.implied_resistance(raw) {
            Some(resistance) => self.percent_for_resistance(resistance),
            None => 0,
        }
    }

    /// Luminosity percentage for an LDR resistance in ohms
    pub fn percent_for_resistance(&self, resistance: f64) -> Percent {
        if resistance.is_nan() || resistance == f64::INFINITY {
            return 0;
        }
        if resistance <= 0.0 {
            return 100;
        }

        let log_r = resistance.ln();
        let log_bright = self.calibration.bright_resistance.ln();
        let log_dark = self.calibration.dark_resistance.ln();

        if log_r > log_dark {
            return 0;
        }
        if log_r < log_bright {
            return 100;
        }

        let percent = 100.0 * (log_dark - log_r) / (log_dark - log_bright);
        percent.clamp(0.0, 100.0) as Percent
    }
}

impl Default for LuminosityEstimator {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_resistance_at_bright_reference_is_hundred() {
        let estimator = LuminosityEstimator::default();
        assert_eq!(estimator.percent_for_resistance(146_000.0), 100);
    }

    #[test]
    fn test_resistance_at_dark_reference_is_zero() {
        let estimator = LuminosityEstimator::default();
        assert_eq!(estimator.percent_for_resistance(5_000_000.0), 0);
    }

    #[test]
    fn test_geometric_mean_is_about_fifty() {
        let estimator = LuminosityEstimator::default();
        let geometric_mean = (146_000.0_f64 * 5_000_000.0).sqrt();
        let percent = estimator.percent_for_resistance(geometric_mean);
        assert!((49..=50).contains(&percent), "got {}", percent);
    }

    #[test]
    fn test_clamps_outside_reference_range() {
        let estimator = LuminosityEstimator::default();
        assert_eq!(estimator.percent_for_resistance(10_000_000.0), 0);
        assert_eq!(estimator.percent_for_resistance(1_000.0), 100);
    }

    #[test]
    fn test_non_finite_resistance_is_guarded() {
        let estimator = LuminosityEstimator::default();
        assert_eq!(estimator.percent_for_resistance(f64::INFINITY), 0);
        assert_eq!(estimator.percent_for_resistance(f64::NAN), 0);
        assert_eq!(estimator.percent_for_resistance(0.0), 100);
    }

    #[test]
    fn test_implied_resistance() {
        let estimator = LuminosityEstimator::default();

        // 10k * (4095 - 2048) / 2048
        let resistance = estimator.implied_resistance(2048).unwrap();
        assert_relative_eq!(resistance, 9995.117, epsilon = 0.01);

        assert!(estimator.implied_resistance(0).is_none());
        assert_relative_eq!(estimator.implied_resistance(4095).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_sample_is_dark() {
        let estimator = LuminosityEstimator::default();
        assert_eq!(estimator.compute_percent(0), 0);
    }

    #[test]
    fn test_full_scale_sample_is_bright() {
        let estimator = LuminosityEstimator::default();
        assert_eq!(estimator.compute_percent(4095), 100);
        assert_eq!(estimator.compute_percent(5000), 100);
    }

    #[test]
    fn test_samples_around_bright_reference() {
        let estimator = LuminosityEstimator::default();
        // 10k * 3833 / 262 ~ 146.3k, just above the bright reference
        assert_eq!(estimator.compute_percent(262), 99);
        // 10k * 3832 / 263 ~ 145.7k, just below it
        assert_eq!(estimator.compute_percent(263), 100);
    }

    #[test]
    fn test_low_samples_are_dark() {
        let estimator = LuminosityEstimator::default();
        // R = 10k * 4087 / 8 ~ 5.1M, beyond the dark reference
        assert_eq!(estimator.compute_percent(8), 0);
    }

    #[test]
    fn test_output_always_in_range_and_monotonic() {
        let estimator = LuminosityEstimator::default();
        let mut previous = 0;
        // Higher samples mean lower resistance, so the percentage never drops
        for raw in 1..4095 {
            let percent = estimator.compute_percent(raw);
            assert!(percent <= 100);
            assert!(percent >= previous, "raw {} went from {} to {}", raw, previous, percent);
            previous = percent;
        }
    }

    #[test]
    fn test_custom_calibration() {
        let estimator = LuminosityEstimator::new(Calibration {
            bright_resistance: 1_000.0,
            dark_resistance: 100_000.0,
            adc_max: 1023.0,
            fixed_resistance: 10_000.0,
        });

        // ln(100k / 3k) / ln(100k / 1k) = 0.761
        assert_eq!(estimator.percent_for_resistance(3_000.0), 76);
        assert_eq!(estimator.calibration().adc_max, 1023.0);
    }

    #[test]
    fn test_default_calibration_is_valid() {
        assert!(Calibration::default().validate().is_ok());
    }

    #[test]
    fn test_calibration_rejects_inverted_references() {
        let calibration = Calibration {
            bright_resistance: 5_000_000.0,
            dark_resistance: 146_000.0,
            ..Calibration::default()
        };
        let err = calibration.validate().unwrap_err();
        assert!(matches!(err, SensorError::Calibration(_)));
    }

    #[test]
    fn test_calibration_rejects_non_positive_values() {
        let calibration = Calibration {
            adc_max: 0.0,
            ..Calibration::default()
        };
        assert!(calibration.validate().is_err());

        let calibration = Calibration {
            fixed_resistance: f64::NAN,
            ..Calibration::default()
        };
        assert!(calibration.validate().is_err());
    }

    #[test]
    fn test_calibration_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bright_resistance = 120000.0").unwrap();
        writeln!(file, "adc_max = 1023.0").unwrap();

        let calibration = Calibration::from_toml_file(file.path()).unwrap();
        assert_relative_eq!(calibration.bright_resistance, 120_000.0);
        assert_relative_eq!(calibration.adc_max, 1023.0);
        // Unset keys fall back to the defaults
        assert_relative_eq!(calibration.dark_resistance, DEFAULT_DARK_RESISTANCE);
        assert_relative_eq!(calibration.fixed_resistance, DEFAULT_FIXED_RESISTANCE);
    }

    #[test]
    fn test_calibration_from_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bright_resistance = \"bright\"").unwrap();

        let err = Calibration::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, SensorError::Toml(_)));
    }
}
