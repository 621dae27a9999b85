//! Crop growing profiles and the table that holds them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ValueRange
// ---------------------------------------------------------------------------

/// An inclusive `[min, max]` range. Serialized as a two-element sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// A range with `min > max` can never match anything.
    pub fn is_inverted(&self) -> bool {
        !(self.min <= self.max)
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<ValueRange> for (f64, f64) {
    fn from(r: ValueRange) -> Self {
        (r.min, r.max)
    }
}

// ---------------------------------------------------------------------------
// CropProfile
// ---------------------------------------------------------------------------

/// The conditions under which a crop is worth sending to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub name: String,
    /// Air temperature in °C.
    pub temperature: ValueRange,
    /// Relative humidity in %.
    pub humidity: ValueRange,
    /// Daily sunlight in hours.
    pub sunlight: ValueRange,
}

impl CropProfile {
    pub fn new(
        name: impl Into<String>,
        temperature: (f64, f64),
        humidity: (f64, f64),
        sunlight: (f64, f64),
    ) -> Self {
        Self {
            name: name.into(),
            temperature: temperature.into(),
            humidity: humidity.into(),
            sunlight: sunlight.into(),
        }
    }

    /// Whether temperature, humidity and sunlight all fall inside the
    /// profile's ranges.
    pub fn admits(&self, temperature: f64, humidity: f64, sunlight_hours: f64) -> bool {
        self.temperature.contains(temperature)
            && self.humidity.contains(humidity)
            && self.sunlight.contains(sunlight_hours)
    }
}

// ---------------------------------------------------------------------------
// CropTable
// ---------------------------------------------------------------------------

/// Ordered set of crop profiles. Scoring and tie-breaking follow this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropTable {
    crops: Vec<CropProfile>,
}

impl CropTable {
    pub fn new(crops: Vec<CropProfile>) -> Self {
        Self { crops }
    }

    pub fn crops(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CropProfile> {
        self.crops.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.crops.iter().map(|c| c.name.as_str())
    }

    /// Label-encoded index of a crop: its position among the crop names
    /// sorted alphabetically. This is the `crop_type` feature classifiers
    /// are trained on.
    pub fn encode(&self, name: &str) -> Option<usize> {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        names.dedup();
        names.binary_search(&name).ok()
    }
}

impl Default for CropTable {
    /// Lettuce, basil, parsley, mint and rosemary.
    fn default() -> Self {
        Self::new(vec![
            CropProfile::new("lettuce", (15.0, 28.0), (60.0, 90.0), (4.0, 8.0)),
            CropProfile::new("basil", (22.0, 35.0), (50.0, 80.0), (6.0, 10.0)),
            CropProfile::new("parsley", (18.0, 30.0), (50.0, 80.0), (4.0, 8.0)),
            CropProfile::new("mint", (18.0, 30.0), (60.0, 90.0), (3.0, 7.0)),
            CropProfile::new("rosemary", (20.0, 32.0), (40.0, 70.0), (7.0, 12.0)),
        ])
    }
}
