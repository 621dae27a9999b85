//! Caller-facing placement requests, the range limits a calling layer
//! enforces on them, and batch execution.

use serde::{Deserialize, Serialize};

use crate::PlacementError;
use crate::optimizer::PlacementOptimizer;
use crate::report::{PlacementReport, run};
use crate::strategy::PlacementStrategy;

/// Arguments of one placement run. Missing fields take the defaults of a
/// 20 m x 20 m farm with 2.5 m hex spacing and at most 15 towers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRequest {
    pub farm_length: f64,
    pub farm_width: f64,
    pub min_spacing: f64,
    pub max_towers: u32,
    pub strategy: PlacementStrategy,
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self {
            farm_length: 20.0,
            farm_width: 20.0,
            min_spacing: 2.5,
            max_towers: 15,
            strategy: PlacementStrategy::HexOffset,
        }
    }
}

impl PlacementRequest {
    pub fn run(&self, optimizer: &PlacementOptimizer) -> Result<PlacementReport, PlacementError> {
        run(
            optimizer,
            self.farm_length,
            self.farm_width,
            self.min_spacing,
            self.max_towers,
            self.strategy,
        )
    }
}

/// Errors from checking a request against [`RequestLimits`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("{field} = {value} is outside the accepted range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Accepted input ranges for requests coming from an outer layer.
///
/// Farm dimensions must be strictly positive and at most `max_dimension`;
/// the other two ranges are inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    pub max_dimension: f64,
    pub min_spacing: (f64, f64),
    pub max_towers: (u32, u32),
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_dimension: 100.0,
            min_spacing: (0.5, 10.0),
            max_towers: (1, 1000),
        }
    }
}

impl RequestLimits {
    /// Check every field of the request, reporting the first violation.
    pub fn check(&self, request: &PlacementRequest) -> Result<(), RequestError> {
        check_dimension("farm_length", request.farm_length, self.max_dimension)?;
        check_dimension("farm_width", request.farm_width, self.max_dimension)?;

        let (lo, hi) = self.min_spacing;
        if !(request.min_spacing >= lo && request.min_spacing <= hi) {
            return Err(RequestError::OutOfRange {
                field: "min_spacing",
                value: request.min_spacing,
                min: lo,
                max: hi,
            });
        }

        let (lo, hi) = self.max_towers;
        if !(lo..=hi).contains(&request.max_towers) {
            return Err(RequestError::OutOfRange {
                field: "max_towers",
                value: f64::from(request.max_towers),
                min: f64::from(lo),
                max: f64::from(hi),
            });
        }
        Ok(())
    }

    /// Check the request, then run it.
    pub fn run_checked(
        &self,
        optimizer: &PlacementOptimizer,
        request: &PlacementRequest,
    ) -> Result<PlacementReport, RequestError> {
        self.check(request)?;
        Ok(request.run(optimizer)?)
    }
}

fn check_dimension(field: &'static str, value: f64, max: f64) -> Result<(), RequestError> {
    if value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(RequestError::OutOfRange {
            field,
            value,
            min: 0.0,
            max,
        })
    }
}

/// Run independent requests, returning results in request order.
///
/// With the `parallel` feature the requests are spread over the rayon
/// thread pool.
pub fn optimize_batch(
    optimizer: &PlacementOptimizer,
    requests: &[PlacementRequest],
) -> Vec<Result<PlacementReport, PlacementError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests.par_iter().map(|r| r.run(optimizer)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        requests.iter().map(|r| r.run(optimizer)).collect()
    }
}
