use serde::Serialize;

use crate::model::{error::FilterError, grid::TerrainGrid, ids::Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Probability of the agent occupying each cell, row-major.
/// Only the filter produces new values; everything else reads them.
pub struct BeliefState {
    rows: usize,
    columns: usize,
    probabilities: Vec<f64>,
}

impl BeliefState {
    /// Uniform prior over every unblocked cell, zero on blocked cells.
    pub fn uniform(grid: &TerrainGrid) -> Result<Self, FilterError> {
        let unblocked = grid.unblocked_count();
        if unblocked == 0 {
            return Err(FilterError::NoUnblockedCells);
        }

        let p = 1.0 / unblocked as f64;
        let probabilities = grid
            .cells()
            .iter()
            .map(|kind| if kind.is_blocked() { 0.0 } else { p })
            .collect();

        let (rows, columns) = grid.dimensions();
        Ok(BeliefState {
            rows,
            columns,
            probabilities,
        })
    }

    pub(crate) fn from_raw(rows: usize, columns: usize, probabilities: Vec<f64>) -> Self {
        debug_assert_eq!(probabilities.len(), rows * columns);
        BeliefState {
            rows,
            columns,
            probabilities,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Return `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Row-major probabilities.
    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of the agent being at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, FilterError> {
        self.probability_at(Position::new(row, col))
    }

    /// Probability of the agent being at `position`.
    pub fn probability_at(&self, position: Position) -> Result<f64, FilterError> {
        if position.row >= self.rows || position.col >= self.columns {
            return Err(FilterError::out_of_bounds(position, self.rows, self.columns));
        }
        Ok(self.probabilities[position.row * self.columns + position.col])
    }

    /// Sum over all cells. Exactly what normalization divides by.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Cell with the highest probability; ties go to the first cell in row-major order.
    pub fn most_likely(&self) -> Option<(Position, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, p) in self.probabilities.iter().copied().enumerate() {
            best = match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((index, p)),
            };
        }

        best.map(|(index, p)| {
            (
                Position::new(index / self.columns, index % self.columns),
                p,
            )
        })
    }

    /// Copy into nested rows, for consumers that want a plain matrix.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.probabilities
            .chunks(self.columns)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Divide every cell by the total mass. `step` names the snapshot being produced.
    pub(crate) fn normalized(mut self, step: usize) -> Result<Self, FilterError> {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(FilterError::DegenerateBelief { step, total });
        }

        for p in &mut self.probabilities {
            *p /= total;
        }
        Ok(self)
    }

    pub(crate) fn has_shape_of(&self, grid: &TerrainGrid) -> bool {
        self.dimensions() == grid.dimensions()
    }
}
