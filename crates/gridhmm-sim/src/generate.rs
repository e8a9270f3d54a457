use gridhmm_core::{
    Action, FilterError, ModelConfig, Observation, Position, Scenario, TerrainGrid,
};
use log::debug;
use rand::{Rng, RngCore, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{GenerationConfig, TerrainThresholds},
    error::SimError,
};

/// Uniform sample in `[0, 1)` built from 64 random bits.
fn uniform_sample<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() as f64) / ((u64::MAX as f64) + 1.0)
}

/// Random grid with the default terrain mix.
pub fn generate_grid<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    rng: &mut R,
) -> Result<TerrainGrid, FilterError> {
    generate_grid_with(rows, columns, &TerrainThresholds::default(), rng)
}

/// Random grid where every cell is drawn independently through `thresholds`.
pub fn generate_grid_with<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    thresholds: &TerrainThresholds,
    rng: &mut R,
) -> Result<TerrainGrid, FilterError> {
    let cells = (0..TerrainGrid::cell_count(rows, columns)?)
        .map(|_| thresholds.classify(uniform_sample(rng)))
        .collect();
    TerrainGrid::new(rows, columns, cells)
}

/// Simulate a random walk of `steps` actions on `grid`.
///
/// The start is a uniformly chosen open cell. Each step draws an action uniformly;
/// the move is attempted with `model.move_success` and only lands on an open
/// in-bounds cell. The sensor reports the true terrain with `model.sensor_match`,
/// otherwise one of the other two readings uniformly.
pub fn generate_scenario<R: Rng + ?Sized>(
    grid: &TerrainGrid,
    model: &ModelConfig,
    steps: usize,
    rng: &mut R,
) -> Result<Scenario, FilterError> {
    let open = grid.unblocked_positions();
    let mut position = *open.choose(rng).ok_or(FilterError::NoUnblockedCells)?;

    let mut positions = Vec::with_capacity(steps + 1);
    let mut actions = Vec::with_capacity(steps);
    let mut observations = Vec::with_capacity(steps);
    positions.push(position);

    for _ in 0..steps {
        let action = Action::ALL[rng.gen_range(0..Action::ALL.len())];

        if uniform_sample(rng) < model.move_success {
            if let Some(next) = grid.open_neighbor(position, action) {
                position = next;
            }
        }

        let observation = sense(grid, model, position, rng)?;

        actions.push(action);
        positions.push(position);
        observations.push(observation);
    }

    debug!(
        "generated {steps} steps from {} on a {}x{} grid",
        positions[0],
        grid.rows(),
        grid.columns()
    );
    Scenario::new(positions, actions, observations)
}

fn sense<R: Rng + ?Sized>(
    grid: &TerrainGrid,
    model: &ModelConfig,
    position: Position,
    rng: &mut R,
) -> Result<Observation, FilterError> {
    let truth = grid
        .kind(position)?
        .as_observation()
        .ok_or(FilterError::BlockedPosition { position })?;

    if uniform_sample(rng) < model.sensor_match {
        Ok(truth)
    } else {
        let alternatives = truth.alternatives();
        Ok(alternatives[rng.gen_range(0..alternatives.len())])
    }
}

#[derive(Debug, Clone)]
/// Seeded generator for grids and scenarios.
pub struct ScenarioGenerator {
    config: GenerationConfig,
    rng: ChaCha8Rng,
}

impl ScenarioGenerator {
    /// Create a generator seeded from `config.seed`.
    pub fn new(config: GenerationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    /// Borrow the generation settings.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Draw a grid with the configured size and terrain mix.
    pub fn grid(&mut self) -> Result<TerrainGrid, SimError> {
        let grid = generate_grid_with(
            self.config.rows,
            self.config.columns,
            &self.config.terrain,
            &mut self.rng,
        )?;
        Ok(grid)
    }

    /// Draw a scenario with the configured number of steps.
    pub fn scenario(&mut self, grid: &TerrainGrid) -> Result<Scenario, SimError> {
        let scenario =
            generate_scenario(grid, &self.config.model, self.config.steps, &mut self.rng)?;
        Ok(scenario)
    }
}
