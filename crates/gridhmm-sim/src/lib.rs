mod config;
mod error;
mod generate;
mod io;
mod report;

pub use config::{GenerationConfig, TerrainThresholds};
pub use error::SimError;
pub use generate::{ScenarioGenerator, generate_grid, generate_grid_with, generate_scenario};
pub use io::{
    load_grid, load_scenario, parse_grid, parse_scenario, save_grid, save_scenario, write_grid,
    write_scenario,
};
pub use report::{StepEstimate, TrackingReport};
