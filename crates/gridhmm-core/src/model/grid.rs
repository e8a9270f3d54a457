use serde::Serialize;

use crate::model::{
    error::FilterError,
    ids::Position,
    terrain::{Action, TerrainKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Immutable terrain map.
/// Cells live in one flat buffer indexed by `row * columns + col`, so every cell is
/// its own storage slot and there is no implicit "empty" terrain.
pub struct TerrainGrid {
    rows: usize,
    columns: usize,
    cells: Vec<TerrainKind>,
    #[serde(skip)]
    unblocked: usize,
}

impl TerrainGrid {
    /// Build a grid from a row-major cell buffer.
    pub fn new(rows: usize, columns: usize, cells: Vec<TerrainKind>) -> Result<Self, FilterError> {
        if rows == 0 || columns == 0 {
            return Err(FilterError::EmptyGrid { rows, columns });
        }

        let expected = Self::cell_count(rows, columns)?;
        if cells.len() != expected {
            return Err(FilterError::CellCount {
                rows,
                columns,
                expected,
                actual: cells.len(),
            });
        }

        let unblocked = cells.iter().filter(|kind| !kind.is_blocked()).count();
        Ok(TerrainGrid {
            rows,
            columns,
            cells,
            unblocked,
        })
    }

    /// Build a grid from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<TerrainKind>>) -> Result<Self, FilterError> {
        let row_count = rows.len();
        let columns = rows.first().map_or(0, Vec::len);

        let mut cells = Vec::with_capacity(row_count * columns);
        for (row, kinds) in rows.into_iter().enumerate() {
            if kinds.len() != columns {
                return Err(FilterError::RaggedRow {
                    row,
                    expected: columns,
                    actual: kinds.len(),
                });
            }
            cells.extend(kinds);
        }

        Self::new(row_count, columns, cells)
    }

    /// Build a grid where every cell has the same terrain.
    pub fn filled(rows: usize, columns: usize, kind: TerrainKind) -> Result<Self, FilterError> {
        Self::new(rows, columns, vec![kind; Self::cell_count(rows, columns)?])
    }

    /// `rows * columns`, or `TooLarge` if that overflows.
    pub fn cell_count(rows: usize, columns: usize) -> Result<usize, FilterError> {
        rows.checked_mul(columns)
            .ok_or(FilterError::TooLarge { rows, columns })
    }

    /// Return `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells, blocked ones included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[TerrainKind] {
        &self.cells
    }

    /// Look up the terrain at `(row, col)`.
    pub fn kind_at(&self, row: usize, col: usize) -> Result<TerrainKind, FilterError> {
        self.kind(Position::new(row, col))
    }

    /// Look up the terrain at a position.
    pub fn kind(&self, position: Position) -> Result<TerrainKind, FilterError> {
        self.index_of(position)
            .map(|index| self.cells[index])
            .ok_or_else(|| FilterError::out_of_bounds(position, self.rows, self.columns))
    }

    /// Check whether a position is inside the grid.
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.columns
    }

    /// Check whether a position is blocked. Out-of-range positions are an error.
    pub fn is_blocked(&self, position: Position) -> Result<bool, FilterError> {
        self.kind(position).map(TerrainKind::is_blocked)
    }

    /// Number of cells the agent can occupy. Computed once at construction.
    pub fn unblocked_count(&self) -> usize {
        self.unblocked
    }

    /// All cells the agent can occupy, in row-major order.
    pub fn unblocked_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| !kind.is_blocked())
            .map(|(index, _)| self.position_of(index))
            .collect()
    }

    /// The in-bounds cell one step away in the direction of `action`.
    pub fn neighbor(&self, position: Position, action: Action) -> Option<Position> {
        let (dr, dc) = action.delta();
        let row = position.row.checked_add_signed(dr)?;
        let col = position.col.checked_add_signed(dc)?;
        let next = Position::new(row, col);
        self.contains(next).then_some(next)
    }

    /// Like `neighbor`, but only if the agent could actually enter that cell.
    pub fn open_neighbor(&self, position: Position, action: Action) -> Option<Position> {
        self.neighbor(position, action)
            .filter(|next| !self.cells[self.flat_index(*next)].is_blocked())
    }

    /// Flat buffer index of a position, if it is in bounds.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        self.contains(position).then(|| self.flat_index(position))
    }

    /// Convert a flat buffer index back into a position.
    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index / self.columns, index % self.columns)
    }

    pub(crate) fn flat_index(&self, position: Position) -> usize {
        position.row * self.columns + position.col
    }
}
