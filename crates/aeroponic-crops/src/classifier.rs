//! The classifier seam and a deterministic reference classifier.

use serde::{Deserialize, Serialize};

use crate::EnvironmentReading;
use crate::profile::ValueRange;

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// Column names, in the order [`FeatureVector::to_array`] emits them.
pub const FEATURE_NAMES: [&str; 9] = [
    "crop_type",
    "temperature",
    "humidity",
    "sunlight_hours",
    "wind_speed",
    "x_coord",
    "y_coord",
    "spacing",
    "shade_percent",
];

/// One classifier input row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Label-encoded crop name, see [`crate::CropTable::encode`].
    pub crop_type: usize,
    pub temperature: f64,
    pub humidity: f64,
    pub sunlight_hours: f64,
    pub wind_speed: f64,
    pub x_coord: f64,
    pub y_coord: f64,
    pub spacing: f64,
    pub shade_percent: f64,
}

impl FeatureVector {
    pub fn new(crop_type: usize, reading: &EnvironmentReading) -> Self {
        Self {
            crop_type,
            temperature: reading.temperature,
            humidity: reading.humidity,
            sunlight_hours: reading.sunlight_hours,
            wind_speed: reading.wind_speed,
            x_coord: reading.x_coord,
            y_coord: reading.y_coord,
            spacing: reading.spacing,
            shade_percent: reading.shade_percent,
        }
    }

    pub fn to_array(&self) -> [f64; 9] {
        [
            self.crop_type as f64,
            self.temperature,
            self.humidity,
            self.sunlight_hours,
            self.wind_speed,
            self.x_coord,
            self.y_coord,
            self.spacing,
            self.shade_percent,
        ]
    }
}

// ---------------------------------------------------------------------------
// Classifier trait
// ---------------------------------------------------------------------------

/// A predicted suitability class with the probability of every class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub class: u8,
    pub probabilities: Vec<f64>,
}

impl Classification {
    /// Highest class probability, 0 when there are none.
    pub fn top_probability(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier has no model for crop {crop}")]
    UnsupportedCrop { crop: String },
    #[error("classifier returned no probabilities")]
    EmptyProbabilities,
}

/// Maps a crop and its features to a suitability class.
///
/// Implementations must be deterministic for identical input.
pub trait SuitabilityClassifier: Send + Sync + std::fmt::Debug {
    fn classify(&self, crop: &str, features: &FeatureVector)
    -> Result<Classification, ClassifierError>;
}

// ---------------------------------------------------------------------------
// ProfileClassifier
// ---------------------------------------------------------------------------

/// Conditions under which a crop grows at its best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealProfile {
    pub temperature: ValueRange,
    pub humidity: ValueRange,
    pub sunlight: ValueRange,
    pub wind: ValueRange,
}

impl IdealProfile {
    pub const fn new(
        temperature: (f64, f64),
        humidity: (f64, f64),
        sunlight: (f64, f64),
        wind: (f64, f64),
    ) -> Self {
        Self {
            temperature: ValueRange::new(temperature.0, temperature.1),
            humidity: ValueRange::new(humidity.0, humidity.1),
            sunlight: ValueRange::new(sunlight.0, sunlight.1),
            wind: ValueRange::new(wind.0, wind.1),
        }
    }

    /// Suitability percentage: 100 minus 20 for temperature, 15 for
    /// humidity, 10 for sunlight and 10 for wind outside the ideal range.
    pub fn percentage(&self, features: &FeatureVector) -> u32 {
        let mut score = 100;
        if !self.temperature.contains(features.temperature) {
            score -= 20;
        }
        if !self.humidity.contains(features.humidity) {
            score -= 15;
        }
        if !self.sunlight.contains(features.sunlight_hours) {
            score -= 10;
        }
        if !self.wind.contains(features.wind_speed) {
            score -= 10;
        }
        score
    }
}

/// Number of suitability classes: poor, fair, good.
pub const CLASS_COUNT: usize = 3;

/// `>= 75` is class 2, `>= 55` is class 1, anything lower is class 0.
pub fn percentage_to_class(pct: u32) -> u8 {
    if pct >= 75 {
        2
    } else if pct >= 55 {
        1
    } else {
        0
    }
}

/// Scores a crop by how many of its ideal ranges the reading hits.
///
/// The predicted class receives `pct / 100` of the probability mass (or
/// `1 - pct / 100` for class 0), and the rest is split evenly between the
/// other classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileClassifier {
    profiles: Vec<(String, IdealProfile)>,
}

impl ProfileClassifier {
    pub fn new(profiles: Vec<(String, IdealProfile)>) -> Self {
        Self { profiles }
    }

    pub fn profile(&self, crop: &str) -> Option<&IdealProfile> {
        self.profiles
            .iter()
            .find(|(name, _)| name == crop)
            .map(|(_, p)| p)
    }
}

impl Default for ProfileClassifier {
    fn default() -> Self {
        let p = |name: &str, profile| (name.to_owned(), profile);
        Self::new(vec![
            p(
                "lettuce",
                IdealProfile::new((15.0, 25.0), (50.0, 80.0), (4.0, 6.0), (0.3, 1.5)),
            ),
            p(
                "basil",
                IdealProfile::new((20.0, 30.0), (50.0, 70.0), (6.0, 8.0), (0.3, 2.0)),
            ),
            p(
                "parsley",
                IdealProfile::new((18.0, 25.0), (50.0, 75.0), (4.0, 6.0), (0.3, 1.5)),
            ),
            p(
                "mint",
                IdealProfile::new((18.0, 28.0), (55.0, 80.0), (4.0, 6.0), (0.4, 2.0)),
            ),
            p(
                "rosemary",
                IdealProfile::new((20.0, 30.0), (40.0, 65.0), (6.0, 8.0), (0.5, 2.5)),
            ),
        ])
    }
}

impl SuitabilityClassifier for ProfileClassifier {
    fn classify(
        &self,
        crop: &str,
        features: &FeatureVector,
    ) -> Result<Classification, ClassifierError> {
        let profile = self
            .profile(crop)
            .ok_or_else(|| ClassifierError::UnsupportedCrop {
                crop: crop.to_owned(),
            })?;

        let pct = profile.percentage(features);
        let class = percentage_to_class(pct);
        let fraction = f64::from(pct) / 100.0;
        let predicted = if class >= 1 { fraction } else { 1.0 - fraction };
        let rest = (1.0 - predicted) / (CLASS_COUNT - 1) as f64;

        let probabilities = (0..CLASS_COUNT)
            .map(|c| if c == usize::from(class) { predicted } else { rest })
            .collect();
        Ok(Classification {
            class,
            probabilities,
        })
    }
}
