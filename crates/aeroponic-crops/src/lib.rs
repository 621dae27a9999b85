//! Crop suitability scoring for aeroponic towers.
//!
//! Given one [`EnvironmentReading`], scores every crop in a [`CropTable`] and
//! recommends the best one.
//!
//! # Pipeline
//!
//! 1. The reading is checked against the physical ranges sensors can report.
//!    Anything outside them is rejected with [`ScoringError::OutOfRange`].
//! 2. A reading that is both scorching and saturated (`temperature >= 45` and
//!    `humidity >= 95`) is rejected outright with
//!    [`ScoringError::UnsuitableEnvironment`].
//! 3. Each crop's [`CropProfile`] acts as a gate. Crops whose temperature,
//!    humidity or sunlight range excludes the reading score 0.
//! 4. Crops that pass the gate are handed to the injected
//!    [`SuitabilityClassifier`]. Its top class probability, scaled by an
//!    extreme-condition penalty, becomes the confidence.
//!
//! The classifier is an explicit handle on [`CropScorer`]; there is no
//! process-wide model. [`ProfileClassifier`] is a deterministic reference
//! implementation.

use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod profile;
pub mod scorer;

pub use classifier::{
    Classification, ClassifierError, FeatureVector, IdealProfile, ProfileClassifier,
    SuitabilityClassifier,
};
pub use profile::{CropProfile, CropTable, ValueRange};
pub use scorer::{CropReport, CropScore, CropScorer, explain, extreme_condition_penalty};

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Environmental conditions at one tower position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    /// °C
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// Hours of sunlight per day.
    pub sunlight_hours: f64,
    pub x_coord: f64,
    pub y_coord: f64,
    /// Tower spacing in meters.
    pub spacing: f64,
    pub shade_percent: f64,
}

impl EnvironmentReading {
    pub const TEMPERATURE: (f64, f64) = (0.0, 50.0);
    pub const HUMIDITY: (f64, f64) = (20.0, 100.0);
    pub const WIND_SPEED: (f64, f64) = (0.0, 10.0);
    pub const SUNLIGHT_HOURS: (f64, f64) = (0.0, 24.0);
    pub const SPACING: (f64, f64) = (0.5, 5.0);
    pub const SHADE_PERCENT: (f64, f64) = (0.0, 100.0);

    /// Check every field against its accepted range, in field order.
    /// Returns the first violation.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let checks = [
            ("temperature", self.temperature, Self::TEMPERATURE),
            ("humidity", self.humidity, Self::HUMIDITY),
            ("wind_speed", self.wind_speed, Self::WIND_SPEED),
            ("sunlight_hours", self.sunlight_hours, Self::SUNLIGHT_HOURS),
            ("spacing", self.spacing, Self::SPACING),
            ("shade_percent", self.shade_percent, Self::SHADE_PERCENT),
        ];
        for (field, value, (min, max)) in checks {
            if !(min..=max).contains(&value) {
                return Err(ScoringError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Conditions no aeroponic crop survives.
    pub fn is_uninhabitable(&self) -> bool {
        self.temperature >= 45.0 && self.humidity >= 95.0
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from scoring a reading.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("environmental conditions are unsuitable for aeroponic crop growth")]
    UnsuitableEnvironment,
    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("unknown crop: {crop}")]
    UnknownCrop { crop: String },
}

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::EnvironmentReading;

    /// A mild reading every default lettuce, parsley and mint profile admits.
    pub fn mild_reading() -> EnvironmentReading {
        EnvironmentReading {
            temperature: 20.0,
            humidity: 65.0,
            wind_speed: 1.0,
            sunlight_hours: 5.0,
            x_coord: 1.0,
            y_coord: 1.0,
            spacing: 2.0,
            shade_percent: 10.0,
        }
    }
}
