//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::optimizer::Placement;
use crate::{FarmBounds, PlacementCap, SPACING_TOLERANCE, SpacingConstraint};

/// How far rounding can pull a tower below the near-edge margin. The far
/// edge is checked on rounded coordinates and needs no such slack.
pub const ROUNDING_TOLERANCE: f64 = 0.005 + 1e-9;

/// Float slack on the far-edge check.
pub const EDGE_SLACK: f64 = 1e-9;

// ===========================================================================
// Constructors
// ===========================================================================

pub fn bounds(length: f64, width: f64) -> FarmBounds {
    FarmBounds::new(length, width).unwrap()
}

pub fn spacing(min_spacing: f64) -> SpacingConstraint {
    SpacingConstraint::new(min_spacing).unwrap()
}

pub fn cap(max_towers: u32) -> PlacementCap {
    PlacementCap::new(max_towers).unwrap()
}

// ===========================================================================
// Invariant checks
// ===========================================================================

/// Smallest distance between any two towers, or `None` for fewer than two.
pub fn min_pairwise_distance(placement: &Placement) -> Option<f64> {
    let points = placement.points();
    let mut best: Option<f64> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.distance(b);
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    best
}

/// Panics if any two towers are closer than `min_spacing`, less the
/// rounding allowance of [`SPACING_TOLERANCE`].
pub fn assert_spacing_invariant(placement: &Placement, min_spacing: f64) {
    let points = placement.points();
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate().skip(i + 1) {
            let d = a.distance(b);
            assert!(
                d >= min_spacing - SPACING_TOLERANCE,
                "towers {} {:?} and {} {:?} are {d} m apart (< {min_spacing})",
                i + 1,
                a,
                j + 1,
                b
            );
        }
    }
}

/// Panics if any tower sits inside the half-spacing margin of the farm.
pub fn assert_within_margin(placement: &Placement, bounds: &FarmBounds, min_spacing: f64) {
    let margin = min_spacing / 2.0;
    for (n, p) in placement.numbered() {
        assert!(
            p.x() >= margin - ROUNDING_TOLERANCE
                && p.x() <= bounds.length() - margin + EDGE_SLACK,
            "tower {n} x = {} outside [{margin}, {}]",
            p.x(),
            bounds.length() - margin
        );
        assert!(
            p.y() >= margin - ROUNDING_TOLERANCE
                && p.y() <= bounds.width() - margin + EDGE_SLACK,
            "tower {n} y = {} outside [{margin}, {}]",
            p.y(),
            bounds.width() - margin
        );
    }
}
