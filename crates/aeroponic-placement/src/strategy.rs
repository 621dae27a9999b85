//! Candidate lattices for the two placement strategies.
//!
//! Each strategy is a fixed scan order over a lattice of candidate points.
//! The order decides which towers win when more candidates qualify than the
//! cap allows, so it is part of the observable output:
//!
//! - **GridScan**: outer loop over x (farm length), inner loop over y (farm
//!   width), both stepping by the minimum spacing.
//! - **HexOffset**: rows along y (farm width) stepping by `s * sqrt(3) / 2`,
//!   columns along x (farm length) stepping by `s`. Odd rows start half a
//!   spacing further along x.
//!
//! Coordinates are derived from integer indices, so long scans do not
//! accumulate floating-point drift. Edge checks are made on the rounded
//! coordinate that will actually be emitted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FarmBounds, PlacementError, Point, SpacingConstraint, round_cm};

/// Which lattice the optimizer scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Axis-aligned square lattice. The simple baseline.
    #[serde(rename = "grid")]
    GridScan,
    /// Triangular lattice with alternating row offset. Packs denser.
    #[default]
    #[serde(rename = "hex")]
    HexOffset,
}

impl PlacementStrategy {
    /// Both strategies.
    pub fn all() -> [PlacementStrategy; 2] {
        [PlacementStrategy::GridScan, PlacementStrategy::HexOffset]
    }

    /// The wire name of this strategy (`"grid"` or `"hex"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStrategy::GridScan => "grid",
            PlacementStrategy::HexOffset => "hex",
        }
    }

    /// Ordered candidate points for this strategy over the given farm.
    pub fn candidates(&self, bounds: &FarmBounds, spacing: &SpacingConstraint) -> LatticeScan {
        let s = spacing.min_spacing();
        let margin = spacing.margin();
        let x_limit = bounds.length() - margin;
        let y_limit = bounds.width() - margin;

        match self {
            PlacementStrategy::GridScan => LatticeScan::new(LatticeShape {
                margin,
                outer_axis: Axis::X,
                outer_step: s,
                outer_limit: x_limit,
                inner_step: s,
                inner_limit: y_limit,
                odd_row_offset: 0.0,
            }),
            PlacementStrategy::HexOffset => LatticeScan::new(LatticeShape {
                margin,
                outer_axis: Axis::Y,
                outer_step: s * 3.0_f64.sqrt() / 2.0,
                outer_limit: y_limit,
                inner_step: s,
                inner_limit: x_limit,
                odd_row_offset: margin,
            }),
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementStrategy {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(PlacementStrategy::GridScan),
            "hex" => Ok(PlacementStrategy::HexOffset),
            _ => Err(PlacementError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// LatticeScan
// ---------------------------------------------------------------------------

/// Float slack on the far-edge comparison. `0.45 + 3 * 0.9` must still land
/// on a `3.15` limit.
const EDGE_EPSILON: f64 = 1e-9;

fn within(coord: f64, limit: f64) -> bool {
    round_cm(coord) <= limit + EDGE_EPSILON
}

/// The axis the outer loop of a scan walks along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy)]
struct LatticeShape {
    margin: f64,
    outer_axis: Axis,
    outer_step: f64,
    outer_limit: f64,
    inner_step: f64,
    inner_limit: f64,
    /// Extra inner-axis start applied on odd (0-indexed) outer rows.
    odd_row_offset: f64,
}

/// Iterator over the candidate points of one strategy, in scan order.
///
/// A coordinate is produced while its rounded value is `<=` its axis limit
/// (`bound - min_spacing / 2`), up to a `1e-9` float slack. Trailing space that
/// the step does not divide evenly is left unused.
#[derive(Debug, Clone)]
pub struct LatticeScan {
    shape: LatticeShape,
    row: u64,
    col: u64,
    done: bool,
}

impl LatticeScan {
    fn new(shape: LatticeShape) -> Self {
        // Even rows start at the margin, so if the margin itself is past
        // either limit no row can ever yield a point.
        let done = !within(shape.margin, shape.outer_limit)
            || !within(shape.margin, shape.inner_limit);
        Self {
            shape,
            row: 0,
            col: 0,
            done,
        }
    }
}

impl Iterator for LatticeScan {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let shape = &self.shape;
        while !self.done {
            let outer = shape.margin + self.row as f64 * shape.outer_step;
            if !within(outer, shape.outer_limit) {
                self.done = true;
                break;
            }

            let start = if self.row % 2 == 1 {
                shape.margin + shape.odd_row_offset
            } else {
                shape.margin
            };
            let inner = start + self.col as f64 * shape.inner_step;
            if !within(inner, shape.inner_limit) {
                self.row += 1;
                self.col = 0;
                continue;
            }

            self.col += 1;
            return Some(match shape.outer_axis {
                Axis::X => Point::new(outer, inner),
                Axis::Y => Point::new(inner, outer),
            });
        }
        None
    }
}

impl std::iter::FusedIterator for LatticeScan {}
