//! Tower placement for rectangular aeroponic farm plots.
//!
//! Packs towers onto a farm so that every pair of towers keeps a minimum
//! spacing and every tower keeps a half-spacing margin from the farm edges.
//! Placement is a deterministic greedy scan over a candidate lattice:
//!
//! - [`PlacementStrategy::GridScan`] walks an axis-aligned square lattice.
//! - [`PlacementStrategy::HexOffset`] walks a triangular lattice with every
//!   odd row shifted by half a spacing. This is the default.
//!
//! Every candidate is checked against the towers accepted so far with
//! [`is_valid`], and the scan stops as soon as the [`PlacementCap`] is hit.
//!
//! # Axes
//!
//! Farm `length` runs along x and farm `width` runs along y. Both strategies
//! and the [`GridMapper`] use this convention.
//!
//! # Example
//!
//! ```rust,ignore
//! let report = optimize_placement(10.0, 10.0, 2.0, 5, PlacementStrategy::GridScan)?;
//! assert_eq!(report.total_towers, 5);
//! assert_eq!(report.tower_positions[0], [1.0, 1.0]);
//! ```

use serde::{Deserialize, Serialize};

pub mod grid;
#[cfg(feature = "placement-io")]
pub mod io;
pub mod optimizer;
pub mod report;
pub mod request;
pub mod strategy;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use grid::{CellIndex, GridMapper, cell_label};
#[cfg(feature = "placement-io")]
pub use io::PlacementIoError;
pub use optimizer::{
    DEFAULT_CANDIDATE_LIMIT, OptimizerConfig, Placement, PlacementOptimizer, ScanStats, optimize,
};
pub use report::{GridSummary, PlacementReport, optimize_placement};
pub use request::{PlacementRequest, RequestError, RequestLimits, optimize_batch};
pub use strategy::{LatticeScan, PlacementStrategy};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A tower position in meters, rounded to centimeters.
///
/// The rounding happens once, at construction, and every spacing check is
/// made against the rounded coordinates with [`SPACING_TOLERANCE`] of slack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: round_cm(x),
            y: round_cm(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

pub(crate) fn round_cm(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// The rectangular extent of a farm plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FarmBounds {
    length: f64,
    width: f64,
}

impl FarmBounds {
    /// Both dimensions must be finite and strictly positive.
    pub fn new(length: f64, width: f64) -> Result<Self, PlacementError> {
        if !(length.is_finite() && width.is_finite() && length > 0.0 && width > 0.0) {
            return Err(PlacementError::InvalidDimension { length, width });
        }
        Ok(Self { length, width })
    }

    /// Extent along the x axis.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Extent along the y axis.
    pub fn width(&self) -> f64 {
        self.width
    }
}

/// Minimum center-to-center distance between two towers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpacingConstraint {
    min_spacing: f64,
}

impl SpacingConstraint {
    pub fn new(min_spacing: f64) -> Result<Self, PlacementError> {
        if !(min_spacing.is_finite() && min_spacing > 0.0) {
            return Err(PlacementError::InvalidSpacing { min_spacing });
        }
        Ok(Self { min_spacing })
    }

    pub fn min_spacing(&self) -> f64 {
        self.min_spacing
    }

    /// Margin kept between a tower and the farm edge.
    pub fn margin(&self) -> f64 {
        self.min_spacing / 2.0
    }
}

/// Upper bound on the number of towers one run may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementCap {
    max_towers: u32,
}

impl PlacementCap {
    pub fn new(max_towers: u32) -> Result<Self, PlacementError> {
        if max_towers == 0 {
            return Err(PlacementError::InvalidCap { max_towers });
        }
        Ok(Self { max_towers })
    }

    pub fn max_towers(&self) -> u32 {
        self.max_towers
    }

    pub(crate) fn as_usize(&self) -> usize {
        self.max_towers as usize
    }
}

/// Errors from placement operations.
///
/// All of these are configuration errors on the caller's side. An empty
/// placement is not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("invalid farm dimensions: length={length}, width={width} (both must be > 0)")]
    InvalidDimension { length: f64, width: f64 },
    #[error("minimum spacing must be positive, got {min_spacing}")]
    InvalidSpacing { min_spacing: f64 },
    #[error("max towers must be at least 1, got {max_towers}")]
    InvalidCap { max_towers: u32 },
    #[error("grid cell size must be positive, got {cell_size}")]
    InvalidCellSize { cell_size: f64 },
    #[error("candidate scan exceeded the limit of {limit} candidates")]
    CandidateLimitExceeded { limit: u64 },
    #[error("unknown placement strategy '{name}' (expected \"grid\" or \"hex\")")]
    UnknownStrategy { name: String },
}

// ---------------------------------------------------------------------------
// Spacing validation
// ---------------------------------------------------------------------------

/// How far centimeter rounding can pull two points together: each
/// coordinate moves by at most half a centimeter, so their offset changes by
/// at most one centimeter per axis. A little float slack is added on top.
pub const SPACING_TOLERANCE: f64 = std::f64::consts::SQRT_2 * 0.01 + 1e-9;

/// Returns `false` iff some point in `placed` lies closer than
/// `min_spacing` to `candidate`, allowing for centimeter rounding.
///
/// Two lattice points exactly `min_spacing` apart can come out a few
/// millimeters closer once both are rounded; those still count as valid.
pub fn is_valid(candidate: Point, placed: &[Point], min_spacing: f64) -> bool {
    let threshold = min_spacing - SPACING_TOLERANCE;
    placed.iter().all(|p| candidate.distance(p) >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Point tests
    // -----------------------------------------------------------------------

    #[test]
    fn point_rounds_to_centimeters() {
        let p = Point::new(1.23456, 7.891);
        assert_eq!(p.x(), 1.23);
        assert_eq!(p.y(), 7.89);

        let q = Point::new(2.0 * 3.0_f64.sqrt(), 0.005);
        assert_eq!(q.x(), 3.46);
        assert_eq!(q.y(), 0.01);
    }

    #[test]
    fn point_distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn point_serializes_as_pair() {
        let p = Point::new(1.5, 2.25);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.5,2.25]");

        let back: Point = serde_json::from_str("[1.999, 0.004]").unwrap();
        assert_eq!(back, Point::new(2.0, 0.0));
    }

    // -----------------------------------------------------------------------
    // Constraint construction
    // -----------------------------------------------------------------------

    #[test]
    fn bounds_reject_non_positive() {
        assert!(FarmBounds::new(10.0, 10.0).is_ok());
        assert!(matches!(
            FarmBounds::new(-5.0, 10.0),
            Err(PlacementError::InvalidDimension { .. })
        ));
        assert!(matches!(
            FarmBounds::new(10.0, 0.0),
            Err(PlacementError::InvalidDimension { .. })
        ));
        assert!(matches!(
            FarmBounds::new(f64::NAN, 10.0),
            Err(PlacementError::InvalidDimension { .. })
        ));
        assert!(matches!(
            FarmBounds::new(10.0, f64::INFINITY),
            Err(PlacementError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn spacing_rejects_non_positive() {
        let s = SpacingConstraint::new(2.5).unwrap();
        assert_eq!(s.min_spacing(), 2.5);
        assert_eq!(s.margin(), 1.25);

        assert!(matches!(
            SpacingConstraint::new(0.0),
            Err(PlacementError::InvalidSpacing { .. })
        ));
        assert!(matches!(
            SpacingConstraint::new(-1.0),
            Err(PlacementError::InvalidSpacing { .. })
        ));
    }

    #[test]
    fn cap_rejects_zero() {
        assert_eq!(PlacementCap::new(1).unwrap().max_towers(), 1);
        assert!(matches!(
            PlacementCap::new(0),
            Err(PlacementError::InvalidCap { max_towers: 0 })
        ));
    }

    // -----------------------------------------------------------------------
    // Spacing validation
    // -----------------------------------------------------------------------

    #[test]
    fn valid_against_empty_placement() {
        assert!(is_valid(Point::new(1.0, 1.0), &[], 2.0));
    }

    #[test]
    fn exact_spacing_is_allowed() {
        let placed = [Point::new(1.0, 1.0)];
        assert!(is_valid(Point::new(3.0, 1.0), &placed, 2.0));
        assert!(is_valid(Point::new(1.0, 3.0), &placed, 2.0));
    }

    #[test]
    fn closer_than_spacing_is_rejected() {
        let placed = [Point::new(1.0, 1.0), Point::new(5.0, 5.0)];
        assert!(!is_valid(Point::new(2.98, 1.0), &placed, 2.0));
        assert!(!is_valid(Point::new(6.0, 6.0), &placed, 2.0));
    }

    #[test]
    fn rounded_lattice_neighbors_are_valid() {
        // 2.25 - 1.35 is 0.8999999999999999 in floating point.
        let placed = [Point::new(0.45, 1.35)];
        assert!(is_valid(Point::new(0.45, 2.25), &placed, 0.9));

        // Hex neighbors at s = 2: dy of 1.732 rounds to 1.73, giving 1.998.
        let placed = [Point::new(1.0, 1.0)];
        assert!(is_valid(Point::new(2.0, 2.73), &placed, 2.0));
    }

    #[test]
    fn diagonal_uses_true_distance() {
        // Axis-aligned offsets of 1.5 each are farther than 2.0 diagonally,
        // but a Chebyshev shortcut would reject the candidate.
        let placed = [Point::new(0.0, 0.0)];
        assert!(is_valid(Point::new(1.5, 1.5), &placed, 2.0));
        assert!(!is_valid(Point::new(1.4, 1.4), &placed, 2.0));
    }

    #[test]
    fn error_display_messages() {
        let e = PlacementError::InvalidDimension {
            length: -5.0,
            width: 10.0,
        };
        assert!(format!("{e}").contains("-5"));

        let e = PlacementError::UnknownStrategy {
            name: "spiral".to_string(),
        };
        assert!(format!("{e}").contains("spiral"));

        let e = PlacementError::CandidateLimitExceeded { limit: 42 };
        assert!(format!("{e}").contains("42"));
    }
}
