//! Greedy placement over a strategy's candidate lattice.
//!
//! The optimizer walks candidates in scan order and accepts each one that
//! keeps the minimum spacing to every tower accepted before it. A run ends
//! when the cap is reached or the lattice is exhausted. Runs share no state,
//! so one optimizer can serve any number of callers.

use serde::{Deserialize, Serialize};

use crate::strategy::PlacementStrategy;
use crate::{FarmBounds, PlacementCap, PlacementError, Point, SpacingConstraint, is_valid};

/// Default ceiling on candidates examined in a single run.
pub const DEFAULT_CANDIDATE_LIMIT: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Accepted tower positions in acceptance order.
///
/// Tower numbers are 1-based positions in this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    points: Vec<Point>,
}

impl Placement {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Towers paired with their 1-based tower number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.points.iter().enumerate().map(|(i, p)| (i + 1, *p))
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl FromIterator<Point> for Placement {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Placement {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Counters describing one optimizer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Candidates pulled from the lattice, accepted or not.
    pub candidates_examined: u64,
    /// Candidates rejected for being too close to an accepted tower.
    pub rejected_by_spacing: u64,
    /// Whether the run stopped on the cap rather than exhausting the lattice.
    pub cap_reached: bool,
}

impl ScanStats {
    pub fn accepted(&self) -> u64 {
        self.candidates_examined - self.rejected_by_spacing
    }
}

// ---------------------------------------------------------------------------
// PlacementOptimizer
// ---------------------------------------------------------------------------

/// Tunables for the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// A run that would examine more candidates than this fails with
    /// [`PlacementError::CandidateLimitExceeded`].
    pub candidate_limit: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

/// Runs a placement strategy over a farm.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementOptimizer {
    config: OptimizerConfig,
}

impl PlacementOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Place towers on the farm using the given strategy.
    pub fn optimize(
        &self,
        bounds: FarmBounds,
        spacing: SpacingConstraint,
        cap: PlacementCap,
        strategy: PlacementStrategy,
    ) -> Result<Placement, PlacementError> {
        self.optimize_with_stats(bounds, spacing, cap, strategy)
            .map(|(placement, _)| placement)
    }

    /// Like [`optimize`](Self::optimize), also returning scan counters.
    pub fn optimize_with_stats(
        &self,
        bounds: FarmBounds,
        spacing: SpacingConstraint,
        cap: PlacementCap,
        strategy: PlacementStrategy,
    ) -> Result<(Placement, ScanStats), PlacementError> {
        let min_spacing = spacing.min_spacing();
        let max_towers = cap.as_usize();
        let mut placed: Vec<Point> = Vec::new();
        let mut stats = ScanStats::default();

        for candidate in strategy.candidates(&bounds, &spacing) {
            if stats.candidates_examined >= self.config.candidate_limit {
                log::warn!(
                    "{strategy} scan over {}x{} m at {min_spacing} m spacing hit the candidate limit",
                    bounds.length(),
                    bounds.width()
                );
                return Err(PlacementError::CandidateLimitExceeded {
                    limit: self.config.candidate_limit,
                });
            }
            stats.candidates_examined += 1;

            if !is_valid(candidate, &placed, min_spacing) {
                stats.rejected_by_spacing += 1;
                continue;
            }
            placed.push(candidate);
            if placed.len() >= max_towers {
                stats.cap_reached = true;
                break;
            }
        }

        log::debug!(
            "{strategy} placement: {} towers from {} candidates ({} rejected, cap reached: {})",
            placed.len(),
            stats.candidates_examined,
            stats.rejected_by_spacing,
            stats.cap_reached
        );

        Ok((Placement { points: placed }, stats))
    }
}

/// Validate raw arguments and run the default optimizer.
pub fn optimize(
    farm_length: f64,
    farm_width: f64,
    min_spacing: f64,
    max_towers: u32,
    strategy: PlacementStrategy,
) -> Result<Placement, PlacementError> {
    let bounds = FarmBounds::new(farm_length, farm_width)?;
    let spacing = SpacingConstraint::new(min_spacing)?;
    let cap = PlacementCap::new(max_towers)?;
    PlacementOptimizer::default().optimize(bounds, spacing, cap, strategy)
}
