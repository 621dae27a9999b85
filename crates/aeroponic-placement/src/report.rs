//! The placement report handed to callers.

use serde::{Deserialize, Serialize};

use crate::grid::GridMapper;
use crate::optimizer::{Placement, PlacementOptimizer};
use crate::strategy::PlacementStrategy;
use crate::{FarmBounds, PlacementCap, PlacementError, SpacingConstraint};

/// Summary of the reporting grid and which of its cells hold towers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub cell_size_m: f64,
    pub n_rows: usize,
    pub n_cols: usize,
    pub eligible_cells: Vec<String>,
}

/// Result of one placement run.
///
/// `total_towers == 0` is a valid outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub total_towers: usize,
    /// `[x, y]` pairs in acceptance order.
    pub tower_positions: Vec<[f64; 2]>,
    pub grid: GridSummary,
}

impl PlacementReport {
    /// Build a report with cells sized to the minimum spacing.
    pub fn new(placement: &Placement, bounds: &FarmBounds, spacing: &SpacingConstraint) -> Self {
        Self::with_mapper(placement, &GridMapper::for_spacing(bounds, spacing))
    }

    pub fn with_mapper(placement: &Placement, mapper: &GridMapper) -> Self {
        Self {
            total_towers: placement.len(),
            tower_positions: placement.iter().map(|&p| p.into()).collect(),
            grid: mapper.summarize(placement),
        }
    }

    /// Towers recovered from the report, in their original order.
    pub fn placement(&self) -> Placement {
        self.tower_positions.iter().map(|&xy| xy.into()).collect()
    }
}

/// Place towers and summarize them, starting from raw caller arguments.
pub fn optimize_placement(
    farm_length: f64,
    farm_width: f64,
    min_spacing: f64,
    max_towers: u32,
    strategy: PlacementStrategy,
) -> Result<PlacementReport, PlacementError> {
    run(
        &PlacementOptimizer::default(),
        farm_length,
        farm_width,
        min_spacing,
        max_towers,
        strategy,
    )
}

pub(crate) fn run(
    optimizer: &PlacementOptimizer,
    farm_length: f64,
    farm_width: f64,
    min_spacing: f64,
    max_towers: u32,
    strategy: PlacementStrategy,
) -> Result<PlacementReport, PlacementError> {
    let bounds = FarmBounds::new(farm_length, farm_width)?;
    let spacing = SpacingConstraint::new(min_spacing)?;
    let cap = PlacementCap::new(max_towers)?;
    let placement = optimizer.optimize(bounds, spacing, cap, strategy)?;
    Ok(PlacementReport::new(&placement, &bounds, &spacing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_for_grid_scan() {
        let report = optimize_placement(10.0, 10.0, 2.0, 5, PlacementStrategy::GridScan).unwrap();
        assert_eq!(report.total_towers, 5);
        assert_eq!(report.tower_positions.len(), 5);
        assert_eq!(report.tower_positions[0], [1.0, 1.0]);
        assert_eq!(report.grid.cell_size_m, 2.0);
        assert_eq!(report.grid.n_rows, 5);
        assert_eq!(report.grid.n_cols, 5);
        assert_eq!(
            report.grid.eligible_cells,
            vec!["A1", "B1", "C1", "D1", "E1"]
        );
    }

    #[test]
    fn empty_report_is_not_an_error() {
        let report = optimize_placement(1.0, 1.0, 5.0, 10, PlacementStrategy::HexOffset).unwrap();
        assert_eq!(report.total_towers, 0);
        assert!(report.tower_positions.is_empty());
        assert!(report.grid.eligible_cells.is_empty());
    }

    #[test]
    fn report_errors_pass_through() {
        assert!(matches!(
            optimize_placement(-5.0, 10.0, 2.0, 5, PlacementStrategy::GridScan),
            Err(PlacementError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn report_json_field_names() {
        let report = optimize_placement(4.0, 4.0, 2.0, 2, PlacementStrategy::GridScan).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_towers"], 2);
        assert_eq!(json["tower_positions"][1][1], 3.0);
        assert_eq!(json["grid"]["cell_size_m"], 2.0);
        assert_eq!(json["grid"]["n_rows"], 2);
        assert_eq!(json["grid"]["n_cols"], 2);
        assert_eq!(json["grid"]["eligible_cells"][0], "A1");
    }

    #[test]
    fn placement_recovered_from_report() {
        let placement =
            crate::optimize(9.0, 9.0, 1.5, 12, PlacementStrategy::HexOffset).unwrap();
        let bounds = FarmBounds::new(9.0, 9.0).unwrap();
        let spacing = SpacingConstraint::new(1.5).unwrap();
        let report = PlacementReport::new(&placement, &bounds, &spacing);
        assert_eq!(report.placement(), placement);
    }
}
