use thiserror::Error;

use crate::model::ids::Position;

#[derive(Debug, Clone, PartialEq, Error)]
/// Error type for grid construction, belief filtering, and scenario validation.
pub enum FilterError {
    #[error("cell ({row}, {col}) is outside a {rows}x{columns} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },

    #[error("No unblocked cells exist")]
    NoUnblockedCells,

    #[error("belief mass vanished at step {step} (total {total})")]
    DegenerateBelief { step: usize, total: f64 },

    #[error("got {actions} actions but {observations} observations")]
    LengthMismatch { actions: usize, observations: usize },

    #[error("step range {from}..{to} is not within the {available} available observations")]
    StepRange {
        from: usize,
        to: usize,
        available: usize,
    },

    #[error("a {rows}x{columns} grid has more cells than can be addressed")]
    TooLarge { rows: usize, columns: usize },

    #[error("grid must have at least one row and one column, got {rows}x{columns}")]
    EmptyGrid { rows: usize, columns: usize },

    #[error("a {rows}x{columns} grid needs {expected} cells, got {actual}")]
    CellCount {
        rows: usize,
        columns: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("belief is {belief_rows}x{belief_columns} but grid is {rows}x{columns}")]
    ShapeMismatch {
        belief_rows: usize,
        belief_columns: usize,
        rows: usize,
        columns: usize,
    },

    #[error(
        "scenario needs one more position than steps: {positions} positions, {actions} actions, {observations} observations"
    )]
    ScenarioLength {
        positions: usize,
        actions: usize,
        observations: usize,
    },

    #[error("scenario position {position} is blocked")]
    BlockedPosition { position: Position },
}

impl FilterError {
    pub(crate) fn out_of_bounds(position: Position, rows: usize, columns: usize) -> Self {
        FilterError::OutOfBounds {
            row: position.row,
            col: position.col,
            rows,
            columns,
        }
    }
}
