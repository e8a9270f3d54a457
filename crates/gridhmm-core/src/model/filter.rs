use std::ops::Range;

use log::{debug, trace, warn};

use crate::model::{
    belief::BeliefState,
    config::ModelConfig,
    error::FilterError,
    grid::TerrainGrid,
    terrain::{Action, Observation},
    trace::BeliefTrace,
};

/// HMM forward filter over a terrain grid.
///
/// Each update is predict, then observe, then normalize. Every call reads the
/// belief it is given and returns a fresh one, so the filter holds no state
/// beyond its model parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeliefFilter {
    model: ModelConfig,
}

impl BeliefFilter {
    pub fn new(model: ModelConfig) -> Self {
        BeliefFilter { model }
    }

    /// Borrow the transition and sensor parameters.
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Uniform prior over the unblocked cells of `grid`.
    pub fn initial_belief(&self, grid: &TerrainGrid) -> Result<BeliefState, FilterError> {
        BeliefState::uniform(grid)
    }

    /// Transition update for `action`, without normalization.
    ///
    /// For an open cell `x`:
    /// - if the agent could leave `x` in the action's direction it stays with
    ///   `move_failure`, otherwise it stays for sure;
    /// - if the cell behind `x` is open, its mass arrives with `move_success`.
    ///
    /// Blocked cells neither give nor receive mass.
    pub fn predict(
        &self,
        grid: &TerrainGrid,
        belief: &BeliefState,
        action: Action,
    ) -> Result<BeliefState, FilterError> {
        self.check_shape(grid, belief)?;

        let prev = belief.as_slice();
        let stay_on_failure = self.model.move_failure();
        let mut next = vec![0.0; prev.len()];

        for (index, kind) in grid.cells().iter().enumerate() {
            if kind.is_blocked() {
                continue;
            }
            let position = grid.position_of(index);

            let stay = match grid.open_neighbor(position, action) {
                Some(_) => stay_on_failure,
                None => 1.0,
            };
            let mut p = stay * prev[index];

            if let Some(source) = grid.open_neighbor(position, action.opposite()) {
                p += self.model.move_success * prev[grid.flat_index(source)];
            }

            next[index] = p;
        }

        let (rows, columns) = grid.dimensions();
        Ok(BeliefState::from_raw(rows, columns, next))
    }

    /// Sensor update for `observation`, without normalization.
    pub fn observe(
        &self,
        grid: &TerrainGrid,
        belief: &BeliefState,
        observation: Observation,
    ) -> Result<BeliefState, FilterError> {
        self.check_shape(grid, belief)?;

        let weighted = grid
            .cells()
            .iter()
            .zip(belief.as_slice())
            .map(|(kind, p)| {
                if kind.is_blocked() {
                    0.0
                } else if observation.matches(*kind) {
                    p * self.model.sensor_match
                } else {
                    p * self.model.sensor_mismatch
                }
            })
            .collect();

        let (rows, columns) = grid.dimensions();
        Ok(BeliefState::from_raw(rows, columns, weighted))
    }

    /// One full forward step: predict, observe, normalize.
    ///
    /// A `DegenerateBelief` error from here reports `step: 1`, counted from `belief`.
    pub fn step(
        &self,
        grid: &TerrainGrid,
        belief: &BeliefState,
        action: Action,
        observation: Observation,
    ) -> Result<BeliefState, FilterError> {
        self.advance(grid, belief, action, observation, 1)
    }

    /// Apply steps `steps.start..steps.end` starting from `belief`, which must be
    /// the belief after `steps.start` updates. Returns the belief after `steps.end`.
    ///
    /// Step `t` produces snapshot `t + 1`; that is the step a `DegenerateBelief`
    /// error carries, whatever range the run started at.
    pub fn run(
        &self,
        grid: &TerrainGrid,
        actions: &[Action],
        observations: &[Observation],
        steps: Range<usize>,
        belief: BeliefState,
    ) -> Result<BeliefState, FilterError> {
        Self::check_inputs(actions, observations, &steps)?;
        self.check_shape(grid, &belief)?;

        let mut belief = belief;
        for t in steps.clone() {
            belief = self
                .advance(grid, &belief, actions[t], observations[t], t + 1)
                .inspect_err(|err| warn!("filter stopped: {err}"))?;
            trace!("step {t}: action {:?}, observation {:?}", actions[t], observations[t]);
        }

        debug!(
            "filtered steps {}..{} on a {}x{} grid",
            steps.start,
            steps.end,
            grid.rows(),
            grid.columns()
        );
        Ok(belief)
    }

    /// Run every step from the uniform prior and return the final belief.
    pub fn run_to_end(
        &self,
        grid: &TerrainGrid,
        actions: &[Action],
        observations: &[Observation],
    ) -> Result<BeliefState, FilterError> {
        let initial = self.initial_belief(grid)?;
        self.run(grid, actions, observations, 0..observations.len(), initial)
    }

    /// Run every step from the uniform prior, keeping each snapshot.
    pub fn trace(
        &self,
        grid: &TerrainGrid,
        actions: &[Action],
        observations: &[Observation],
    ) -> Result<BeliefTrace, FilterError> {
        Self::check_inputs(actions, observations, &(0..observations.len()))?;

        let mut history = BeliefTrace::new(self.initial_belief(grid)?);
        for (action, observation) in actions.iter().zip(observations) {
            let Some(prev) = history.last() else {
                break;
            };
            let next = self
                .advance(grid, prev, *action, *observation, history.len())
                .inspect_err(|err| warn!("filter stopped: {err}"))?;
            let step = history.push(next);
            trace!("recorded snapshot {step}");
        }

        debug!("traced {} steps", history.steps());
        Ok(history)
    }

    fn advance(
        &self,
        grid: &TerrainGrid,
        belief: &BeliefState,
        action: Action,
        observation: Observation,
        step: usize,
    ) -> Result<BeliefState, FilterError> {
        let predicted = self.predict(grid, belief, action)?;
        let observed = self.observe(grid, &predicted, observation)?;
        observed.normalized(step)
    }

    fn check_inputs(
        actions: &[Action],
        observations: &[Observation],
        steps: &Range<usize>,
    ) -> Result<(), FilterError> {
        if actions.len() != observations.len() {
            return Err(FilterError::LengthMismatch {
                actions: actions.len(),
                observations: observations.len(),
            });
        }
        if steps.start > steps.end || steps.end > observations.len() {
            return Err(FilterError::StepRange {
                from: steps.start,
                to: steps.end,
                available: observations.len(),
            });
        }
        Ok(())
    }

    fn check_shape(&self, grid: &TerrainGrid, belief: &BeliefState) -> Result<(), FilterError> {
        if belief.has_shape_of(grid) {
            return Ok(());
        }
        let (belief_rows, belief_columns) = belief.dimensions();
        let (rows, columns) = grid.dimensions();
        Err(FilterError::ShapeMismatch {
            belief_rows,
            belief_columns,
            rows,
            columns,
        })
    }
}
