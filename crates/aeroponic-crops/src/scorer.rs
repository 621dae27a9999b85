//! Scoring every crop in a table against one reading.

use serde::{Deserialize, Serialize};

use crate::classifier::{FeatureVector, SuitabilityClassifier};
use crate::profile::{CropProfile, CropTable};
use crate::{EnvironmentReading, ScoringError};

const FALLBACK_EXPLANATION: &str = "Suitable under given environmental conditions";

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropScore {
    pub crop: String,
    /// Classifier class, 0 when the crop failed the profile gate.
    pub suitability_score: u8,
    /// Percent, rounded to two decimals.
    pub confidence: f64,
    pub explanation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropReport {
    /// One entry per crop, in table order.
    pub all_scores: Vec<CropScore>,
    /// The single best crop, or empty when the table is empty.
    pub recommended_crops: Vec<String>,
}

impl CropReport {
    pub fn recommended(&self) -> Option<&str> {
        self.recommended_crops.first().map(String::as_str)
    }

    pub fn score_for(&self, crop: &str) -> Option<&CropScore> {
        self.all_scores.iter().find(|s| s.crop == crop)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Confidence multiplier for conditions that stress any crop.
pub fn extreme_condition_penalty(temperature: f64, humidity: f64, sunlight_hours: f64) -> f64 {
    let mut penalty = 1.0;
    if temperature > 40.0 {
        penalty *= 0.4;
    }
    if humidity > 90.0 {
        penalty *= 0.6;
    }
    if sunlight_hours > 12.0 {
        penalty *= 0.7;
    }
    penalty
}

/// Human-readable reasons a crop suits the conditions. Crops without
/// specific rules, or readings that trigger none, get a generic reason.
pub fn explain(crop: &str, temperature: f64, humidity: f64, sunlight_hours: f64) -> Vec<String> {
    let mut reasons = Vec::new();
    let mut because = |cond: bool, reason: &str| {
        if cond {
            reasons.push(reason.to_owned());
        }
    };

    match crop {
        "lettuce" => {
            because(temperature <= 28.0, "Performs well in moderate temperatures");
            because(humidity >= 60.0, "Thrives in high humidity");
            because(sunlight_hours <= 8.0, "Prefers controlled sunlight");
        }
        "basil" => {
            because(temperature >= 24.0, "Grows best in warm temperatures");
            because(sunlight_hours >= 6.0, "Requires sufficient sunlight");
        }
        "parsley" => {
            because(temperature <= 30.0, "Adaptable to mild temperatures");
            because(sunlight_hours <= 8.0, "Tolerates partial sunlight");
        }
        "mint" => {
            because(humidity >= 60.0, "Favors humid environments");
            because(sunlight_hours <= 7.0, "Prefers indirect sunlight");
        }
        "rosemary" => {
            because(sunlight_hours >= 7.0, "Needs strong sunlight");
            because(humidity <= 70.0, "Prefers low to moderate humidity");
        }
        _ => {}
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_EXPLANATION.to_owned());
    }
    reasons
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// CropScorer
// ---------------------------------------------------------------------------

/// Scores crops with an optional injected classifier.
///
/// Without a classifier every crop scores 0 with confidence 0, which still
/// yields a (weak) recommendation.
#[derive(Debug, Default)]
pub struct CropScorer {
    table: CropTable,
    classifier: Option<Box<dyn SuitabilityClassifier>>,
}

impl CropScorer {
    pub fn new(table: CropTable) -> Self {
        Self {
            table,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl SuitabilityClassifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn table(&self) -> &CropTable {
        &self.table
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Score every crop in table order and pick a recommendation.
    pub fn score(&self, reading: &EnvironmentReading) -> Result<CropReport, ScoringError> {
        if let Err(e) = reading.validate() {
            log::warn!("rejected reading: {e}");
            return Err(e);
        }
        if reading.is_uninhabitable() {
            log::warn!(
                "rejected reading: temperature {} with humidity {}",
                reading.temperature,
                reading.humidity
            );
            return Err(ScoringError::UnsuitableEnvironment);
        }
        if self.classifier.is_none() {
            log::warn!("no suitability classifier configured; all crops score 0");
        }

        let all_scores = self
            .table
            .crops()
            .iter()
            .map(|profile| self.score_profile(profile, reading))
            .collect::<Result<Vec<_>, _>>()?;

        let recommended_crops = recommend(&all_scores)
            .map(|s| vec![s.crop.clone()])
            .unwrap_or_default();

        log::debug!(
            "scored {} crops, recommended {:?}",
            all_scores.len(),
            recommended_crops
        );
        Ok(CropReport {
            all_scores,
            recommended_crops,
        })
    }

    /// Score a single crop. The reading is not range-checked.
    pub fn score_crop(
        &self,
        crop: &str,
        reading: &EnvironmentReading,
    ) -> Result<CropScore, ScoringError> {
        let profile = self
            .table
            .get(crop)
            .ok_or_else(|| ScoringError::UnknownCrop {
                crop: crop.to_owned(),
            })?;
        self.score_profile(profile, reading)
    }

    fn score_profile(
        &self,
        profile: &CropProfile,
        reading: &EnvironmentReading,
    ) -> Result<CropScore, ScoringError> {
        let (suitability_score, confidence) = if !profile.admits(
            reading.temperature,
            reading.humidity,
            reading.sunlight_hours,
        ) {
            (0, 0.0)
        } else if let Some(classifier) = &self.classifier {
            let crop_type = self.table.encode(&profile.name).unwrap_or(0);
            let features = FeatureVector::new(crop_type, reading);
            let classification = classifier.classify(&profile.name, &features)?;
            let penalty = extreme_condition_penalty(
                reading.temperature,
                reading.humidity,
                reading.sunlight_hours,
            );
            (
                classification.class,
                round2(classification.top_probability() * 100.0 * penalty),
            )
        } else {
            (0, 0.0)
        };

        Ok(CropScore {
            crop: profile.name.clone(),
            suitability_score,
            confidence,
            explanation: explain(
                &profile.name,
                reading.temperature,
                reading.humidity,
                reading.sunlight_hours,
            ),
        })
    }
}

/// Highest score wins; ties go to the higher confidence, then to the earlier
/// crop.
fn recommend(scores: &[CropScore]) -> Option<&CropScore> {
    scores.iter().fold(None, |best: Option<&CropScore>, s| match best {
        Some(b)
            if s.suitability_score < b.suitability_score
                || (s.suitability_score == b.suitability_score
                    && s.confidence <= b.confidence) =>
        {
            Some(b)
        }
        _ => Some(s),
    })
}
