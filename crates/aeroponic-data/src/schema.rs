//! On-disk shapes of the farm data files.
//!
//! These are deserialized from RON, JSON or TOML and then checked and turned
//! into crop and placement types by the loader.

use serde::Deserialize;

// ===========================================================================
// Crops
// ===========================================================================

/// One crop profile in `crops.{ron,toml,json}`. Ranges are `[min, max]`.
#[derive(Debug, Clone, Deserialize)]
pub struct CropData {
    pub name: String,
    pub temperature: (f64, f64),
    pub humidity: (f64, f64),
    pub sunlight: (f64, f64),
}

// ===========================================================================
// Placement
// ===========================================================================

/// Contents of the optional `placement.{ron,toml,json}`. Every field may be
/// left out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacementData {
    #[serde(default)]
    pub defaults: RequestDefaultsData,
    #[serde(default)]
    pub limits: LimitsData,
    #[serde(default)]
    pub candidate_limit: Option<u64>,
}

/// Overrides for the request a farm runs when the caller gives none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestDefaultsData {
    #[serde(default)]
    pub farm_length: Option<f64>,
    #[serde(default)]
    pub farm_width: Option<f64>,
    #[serde(default)]
    pub min_spacing: Option<f64>,
    #[serde(default)]
    pub max_towers: Option<u32>,
    /// `"grid"` or `"hex"`.
    #[serde(default)]
    pub strategy: Option<String>,
}

/// Overrides for the accepted request ranges.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsData {
    #[serde(default)]
    pub max_dimension: Option<f64>,
    #[serde(default)]
    pub min_spacing: Option<(f64, f64)>,
    #[serde(default)]
    pub max_towers: Option<(u32, u32)>,
}
