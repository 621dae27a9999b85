//! Checked farm configuration built from the data files.

use aeroponic_crops::{CropProfile, CropScorer, CropTable};
use aeroponic_placement::{
    OptimizerConfig, PlacementOptimizer, PlacementReport, PlacementRequest, PlacementStrategy,
    RequestError, RequestLimits,
};
use std::collections::HashSet;
use std::path::Path;

use crate::loader::{
    DataLoadError, check_duplicate, check_range, deserialize_file, deserialize_list,
    find_data_file, parse_error, require_data_file,
};
use crate::schema::{CropData, PlacementData};

// ===========================================================================
// Config types
// ===========================================================================

/// Placement configuration of a farm. `defaults` is the request run when the
/// caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementSettings {
    pub defaults: PlacementRequest,
    pub limits: RequestLimits,
    pub optimizer: OptimizerConfig,
}

impl PlacementSettings {
    pub fn optimizer(&self) -> PlacementOptimizer {
        PlacementOptimizer::new(self.optimizer)
    }

    /// Check `request` against the limits and run it.
    pub fn run(&self, request: &PlacementRequest) -> Result<PlacementReport, RequestError> {
        self.limits.run_checked(&self.optimizer(), request)
    }

    pub fn run_defaults(&self) -> Result<PlacementReport, RequestError> {
        self.run(&self.defaults)
    }
}

/// A fully loaded and checked farm configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmConfig {
    pub crops: CropTable,
    pub placement: PlacementSettings,
}

impl FarmConfig {
    /// A scorer over the loaded crops, without a classifier attached.
    pub fn crop_scorer(&self) -> CropScorer {
        CropScorer::new(self.crops.clone())
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load `crops.*` (required) and `placement.*` (optional) from `dir`.
pub fn load_farm_config(dir: &Path) -> Result<FarmConfig, DataLoadError> {
    let crops = load_crops(&require_data_file(dir, "crops")?)?;

    let placement = match find_data_file(dir, "placement")? {
        Some(path) => load_placement_settings(&path)?,
        None => {
            log::info!("no placement file in {}, using defaults", dir.display());
            PlacementSettings::default()
        }
    };

    Ok(FarmConfig { crops, placement })
}

/// Load and check a crop list. TOML files keep it under `crops`.
pub fn load_crops(path: &Path) -> Result<CropTable, DataLoadError> {
    let data: Vec<CropData> = deserialize_list(path, "crops")?;

    let mut seen = HashSet::new();
    let mut profiles = Vec::with_capacity(data.len());
    for crop in data {
        check_duplicate(&mut seen, &crop.name, path)?;
        check_range(crop.temperature, &crop.name, "temperature", path)?;
        check_range(crop.humidity, &crop.name, "humidity", path)?;
        check_range(crop.sunlight, &crop.name, "sunlight", path)?;
        profiles.push(CropProfile::new(
            crop.name,
            crop.temperature,
            crop.humidity,
            crop.sunlight,
        ));
    }

    log::info!("loaded {} crops from {}", profiles.len(), path.display());
    Ok(CropTable::new(profiles))
}

/// Load placement settings, filling gaps from the built-in defaults.
///
/// The resulting defaults must themselves satisfy the resulting limits.
pub fn load_placement_settings(path: &Path) -> Result<PlacementSettings, DataLoadError> {
    let data: PlacementData = deserialize_file(path)?;
    let mut settings = PlacementSettings::default();

    let d = data.defaults;
    let defaults = &mut settings.defaults;
    defaults.farm_length = d.farm_length.unwrap_or(defaults.farm_length);
    defaults.farm_width = d.farm_width.unwrap_or(defaults.farm_width);
    defaults.min_spacing = d.min_spacing.unwrap_or(defaults.min_spacing);
    defaults.max_towers = d.max_towers.unwrap_or(defaults.max_towers);
    if let Some(name) = d.strategy {
        defaults.strategy = name
            .parse::<PlacementStrategy>()
            .map_err(|e| parse_error(path, e))?;
    }

    let l = data.limits;
    let limits = &mut settings.limits;
    if let Some(max) = l.max_dimension {
        check_range((0.0, max), "limits", "max_dimension", path)?;
        limits.max_dimension = max;
    }
    if let Some(range) = l.min_spacing {
        check_range(range, "limits", "min_spacing", path)?;
        limits.min_spacing = range;
    }
    if let Some((lo, hi)) = l.max_towers {
        check_range((f64::from(lo), f64::from(hi)), "limits", "max_towers", path)?;
        limits.max_towers = (lo, hi);
    }

    if let Some(limit) = data.candidate_limit {
        if limit == 0 {
            return Err(parse_error(path, "candidate_limit must be at least 1"));
        }
        settings.optimizer.candidate_limit = limit;
    }

    settings
        .limits
        .check(&settings.defaults)
        .map_err(|e| parse_error(path, format!("defaults: {e}")))?;

    log::info!("loaded placement settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_dir::{cleanup, make_test_dir};
    use std::fs;

    const CROPS_JSON: &str = r#"[
        {"name": "lettuce", "temperature": [15, 28], "humidity": [60, 90], "sunlight": [4, 8]},
        {"name": "basil", "temperature": [22, 35], "humidity": [50, 80], "sunlight": [6, 10]}
    ]"#;

    // -----------------------------------------------------------------------
    // Crops
    // -----------------------------------------------------------------------

    #[test]
    fn crops_keep_file_order() {
        let dir = make_test_dir("config_crops_order");
        let path = dir.join("crops.json");
        fs::write(&path, CROPS_JSON).unwrap();

        let table = load_crops(&path).unwrap();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["lettuce", "basil"]);
        assert_eq!(table.get("basil").unwrap().sunlight.max, 10.0);

        cleanup(&dir);
    }

    #[test]
    fn duplicate_crop_is_rejected() {
        let dir = make_test_dir("config_crops_dup");
        let path = dir.join("crops.ron");
        fs::write(
            &path,
            r#"[
                (name: "mint", temperature: (18.0, 30.0), humidity: (60.0, 90.0), sunlight: (3.0, 7.0)),
                (name: "mint", temperature: (18.0, 30.0), humidity: (60.0, 90.0), sunlight: (3.0, 7.0)),
            ]"#,
        )
        .unwrap();

        let result = load_crops(&path);
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "mint"
        ));

        cleanup(&dir);
    }

    #[test]
    fn inverted_crop_range_is_rejected() {
        let dir = make_test_dir("config_crops_inverted");
        let path = dir.join("crops.toml");
        fs::write(
            &path,
            r#"
[[crops]]
name = "basil"
temperature = [22.0, 35.0]
humidity = [80.0, 50.0]
sunlight = [6.0, 10.0]
"#,
        )
        .unwrap();

        let result = load_crops(&path);
        assert!(matches!(
            result,
            Err(DataLoadError::InvalidRange { field: "humidity", ref name, .. }) if name == "basil"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Placement settings
    // -----------------------------------------------------------------------

    #[test]
    fn placement_overrides_merge_with_defaults() {
        let dir = make_test_dir("config_placement_merge");
        let path = dir.join("placement.toml");
        fs::write(
            &path,
            r#"
candidate_limit = 5000

[defaults]
farm_length = 30.0
strategy = "grid"

[limits]
min_spacing = [1.0, 5.0]
"#,
        )
        .unwrap();

        let settings = load_placement_settings(&path).unwrap();
        assert_eq!(settings.defaults.farm_length, 30.0);
        assert_eq!(settings.defaults.farm_width, 20.0);
        assert_eq!(settings.defaults.min_spacing, 2.5);
        assert_eq!(settings.defaults.strategy, PlacementStrategy::GridScan);
        assert_eq!(settings.limits.min_spacing, (1.0, 5.0));
        assert_eq!(settings.limits.max_towers, (1, 1000));
        assert_eq!(settings.optimizer.candidate_limit, 5000);

        cleanup(&dir);
    }

    #[test]
    fn ron_placement_with_implicit_some() {
        let dir = make_test_dir("config_placement_ron");
        let path = dir.join("placement.ron");
        fs::write(
            &path,
            "#![enable(implicit_some)]\n(defaults: (max_towers: 40), limits: (max_towers: (1, 50)))",
        )
        .unwrap();

        let settings = load_placement_settings(&path).unwrap();
        assert_eq!(settings.defaults.max_towers, 40);
        assert_eq!(settings.limits.max_towers, (1, 50));

        cleanup(&dir);
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        let dir = make_test_dir("config_placement_strategy");
        let path = dir.join("placement.json");
        fs::write(&path, r#"{"defaults": {"strategy": "spiral"}}"#).unwrap();

        let result = load_placement_settings(&path);
        assert!(matches!(
            result,
            Err(DataLoadError::Parse { ref detail, .. }) if detail.contains("spiral")
        ));

        cleanup(&dir);
    }

    #[test]
    fn defaults_outside_limits_are_rejected() {
        let dir = make_test_dir("config_placement_defaults");
        let path = dir.join("placement.json");
        fs::write(&path, r#"{"limits": {"min_spacing": [3.0, 5.0]}}"#).unwrap();

        // Built-in default spacing 2.5 falls below the new floor.
        let result = load_placement_settings(&path);
        assert!(matches!(
            result,
            Err(DataLoadError::Parse { ref detail, .. }) if detail.contains("min_spacing")
        ));

        cleanup(&dir);
    }

    #[test]
    fn zero_candidate_limit_is_rejected() {
        let dir = make_test_dir("config_placement_zero_limit");
        let path = dir.join("placement.json");
        fs::write(&path, r#"{"candidate_limit": 0}"#).unwrap();

        assert!(matches!(
            load_placement_settings(&path),
            Err(DataLoadError::Parse { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn inverted_limit_is_rejected() {
        let dir = make_test_dir("config_placement_inverted");
        let path = dir.join("placement.json");
        fs::write(&path, r#"{"limits": {"max_towers": [10, 1]}}"#).unwrap();

        assert!(matches!(
            load_placement_settings(&path),
            Err(DataLoadError::InvalidRange {
                field: "max_towers",
                ..
            })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_farm_config
    // -----------------------------------------------------------------------

    #[test]
    fn farm_config_without_placement_file() {
        let dir = make_test_dir("config_farm_no_placement");
        fs::write(dir.join("crops.json"), CROPS_JSON).unwrap();

        let config = load_farm_config(&dir).unwrap();
        assert_eq!(config.crops.len(), 2);
        assert_eq!(config.placement, PlacementSettings::default());

        let report = config.placement.run_defaults().unwrap();
        assert!(report.total_towers <= 15);

        cleanup(&dir);
    }

    #[test]
    fn farm_config_requires_crops() {
        let dir = make_test_dir("config_farm_no_crops");
        fs::write(dir.join("placement.json"), "{}").unwrap();

        assert!(matches!(
            load_farm_config(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn settings_enforce_limits_on_run() {
        let settings = PlacementSettings::default();
        let request = PlacementRequest {
            max_towers: 5000,
            ..PlacementRequest::default()
        };
        assert!(matches!(
            settings.run(&request),
            Err(RequestError::OutOfRange {
                field: "max_towers",
                ..
            })
        ));
    }
}
