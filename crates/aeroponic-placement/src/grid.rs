//! Discrete cell labels for reporting where towers landed.
//!
//! The farm is divided into square cells of `cell_size` meters. Rows run
//! along y (farm width) and are lettered `A`, `B`, ...; columns run along x
//! (farm length) and are numbered from 1. A tower at row 1, column 2 lies in
//! cell `"B3"`. Rows past `Z` are written numerically as `"{row}-{col}"`,
//! both 1-based, so `"27-3"` is the 27th row, third column.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::optimizer::Placement;
use crate::report::GridSummary;
use crate::{FarmBounds, PlacementError, Point, SpacingConstraint};

const LETTERED_ROWS: usize = 26;

/// Zero-based row and column of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn label(&self) -> String {
        cell_label(self.row, self.col)
    }
}

/// Human-readable label for a zero-based cell index.
pub fn cell_label(row: usize, col: usize) -> String {
    if row < LETTERED_ROWS {
        let letter = char::from(b'A' + row as u8);
        format!("{letter}{}", col + 1)
    } else {
        format!("{}-{}", row + 1, col + 1)
    }
}

/// Maps continuous coordinates onto a farm's reporting grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapper {
    cell_size: f64,
    n_rows: usize,
    n_cols: usize,
}

impl GridMapper {
    /// Cells of `cell_size` meters over the farm. Partial cells at the far
    /// edges count as whole cells.
    pub fn new(bounds: &FarmBounds, cell_size: f64) -> Result<Self, PlacementError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PlacementError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            cell_size,
            n_rows: cell_count(bounds.width(), cell_size),
            n_cols: cell_count(bounds.length(), cell_size),
        })
    }

    /// Cells sized to the minimum spacing, the default reporting grid.
    pub fn for_spacing(bounds: &FarmBounds, spacing: &SpacingConstraint) -> Self {
        let cell_size = spacing.min_spacing();
        Self {
            cell_size,
            n_rows: cell_count(bounds.width(), cell_size),
            n_cols: cell_count(bounds.length(), cell_size),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// The cell containing `point`, clamped onto the grid.
    pub fn cell_of(&self, point: Point) -> CellIndex {
        CellIndex {
            row: axis_cell(point.y(), self.cell_size, self.n_rows),
            col: axis_cell(point.x(), self.cell_size, self.n_cols),
        }
    }

    pub fn label_of(&self, point: Point) -> String {
        self.cell_of(point).label()
    }

    /// Labels of the cells holding at least one tower, in first-seen order.
    pub fn eligible_cells(&self, placement: &Placement) -> Vec<String> {
        let mut seen = BTreeSet::new();
        placement
            .iter()
            .map(|&p| self.cell_of(p))
            .filter(|cell| seen.insert(*cell))
            .map(|cell| cell.label())
            .collect()
    }

    pub fn summarize(&self, placement: &Placement) -> GridSummary {
        GridSummary {
            cell_size_m: self.cell_size,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            eligible_cells: self.eligible_cells(placement),
        }
    }
}

fn cell_count(extent: f64, cell_size: f64) -> usize {
    ((extent / cell_size).ceil() as usize).max(1)
}

fn axis_cell(coord: f64, cell_size: f64, count: usize) -> usize {
    let raw = (coord / cell_size).floor().max(0.0) as usize;
    raw.min(count - 1)
}
