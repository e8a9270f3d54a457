use serde::Serialize;

use crate::model::{
    error::FilterError,
    grid::TerrainGrid,
    ids::Position,
    terrain::{Action, Observation},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One recorded walk: ground-truth positions plus what the agent did and sensed.
/// `positions[0]` is the start; `positions[t + 1]` is where the agent ended up
/// after `actions[t]`, and `observations[t]` was read there.
pub struct Scenario {
    positions: Vec<Position>,
    actions: Vec<Action>,
    observations: Vec<Observation>,
}

impl Scenario {
    /// Assemble a scenario, checking the sequence lengths line up.
    pub fn new(
        positions: Vec<Position>,
        actions: Vec<Action>,
        observations: Vec<Observation>,
    ) -> Result<Self, FilterError> {
        if positions.is_empty()
            || actions.len() != observations.len()
            || positions.len() != actions.len() + 1
        {
            return Err(FilterError::ScenarioLength {
                positions: positions.len(),
                actions: actions.len(),
                observations: observations.len(),
            });
        }

        Ok(Scenario {
            positions,
            actions,
            observations,
        })
    }

    /// Check that every recorded position is an open cell of `grid`.
    pub fn validate_against(&self, grid: &TerrainGrid) -> Result<(), FilterError> {
        for position in &self.positions {
            if grid.is_blocked(*position)? {
                return Err(FilterError::BlockedPosition {
                    position: *position,
                });
            }
        }
        Ok(())
    }

    pub fn start(&self) -> Position {
        self.positions[0]
    }

    /// Number of actions taken.
    pub fn steps(&self) -> usize {
        self.actions.len()
    }

    /// Ground-truth positions, start included.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }
}
