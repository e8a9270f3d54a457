//! GRIDHMM: generate terrain grids and random walks, then localize the agent with
//! an HMM forward filter.
//!
//! - `generate`: draw a grid and a scenario and write both as text files.
//! - `filter`: load a grid and a scenario and report the filter's per-step estimates.
//! - `run`: generate and filter in one go.

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use gridhmm_core::{BeliefFilter, ModelConfig, Scenario, TerrainGrid};
use gridhmm_sim::{
    GenerationConfig, ScenarioGenerator, TrackingReport, load_grid, load_scenario, save_grid,
    save_scenario,
};
use log::{debug, info};

#[derive(Parser)]
#[command(author, version, about = "Terrain-grid localization with an HMM forward filter.")]
struct Cli {
    /// Generation and model settings (YAML). Defaults are used if omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a grid and a scenario and save them
    Generate(GenerateArgs),
    /// Filter a saved scenario on a saved grid
    Filter(FilterArgs),
    /// Generate a grid and a scenario, then filter it
    Run(RunArgs),
}

#[derive(Args, Clone)]
struct Overrides {
    /// Number of grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of grid columns
    #[arg(long)]
    columns: Option<usize>,

    /// Number of actions in the walk
    #[arg(long)]
    steps: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    overrides: Overrides,

    /// Directory for grid.txt and scenario.txt
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

#[derive(Args)]
struct FilterArgs {
    /// Grid file
    #[arg(long)]
    grid: PathBuf,

    /// Scenario file
    #[arg(long)]
    scenario: PathBuf,

    /// Write every belief snapshot as JSON
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    overrides: Overrides,

    /// Also save the generated files into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write every belief snapshot as JSON
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

/// Log to stderr at `level`, with a timestamp on every line.
fn init_logger(level: &str) -> Result<(), Box<dyn Error>> {
    let level: log::LevelFilter = level
        .parse()
        .map_err(|_| format!("invalid log level '{level}'"))?;

    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init()?;
    Ok(())
}

fn load_config(
    path: Option<&PathBuf>,
    overrides: Option<&Overrides>,
) -> Result<GenerationConfig, Box<dyn Error>> {
    let mut config = match path {
        Some(path) => GenerationConfig::from_yaml_path(path)?,
        None => GenerationConfig::from_default_yaml()?,
    };

    if let Some(overrides) = overrides {
        config.rows = overrides.rows.unwrap_or(config.rows);
        config.columns = overrides.columns.unwrap_or(config.columns);
        config.steps = overrides.steps.unwrap_or(config.steps);
        config.seed = overrides.seed.unwrap_or(config.seed);
    }
    config.validate()?;
    Ok(config)
}

fn generate(config: GenerationConfig) -> Result<(TerrainGrid, Scenario), Box<dyn Error>> {
    let mut generator = ScenarioGenerator::new(config)?;
    let grid = generator.grid()?;
    let scenario = generator.scenario(&grid)?;
    info!(
        "generated a {}x{} grid ({} open cells) and a {}-step walk from {}",
        grid.rows(),
        grid.columns(),
        grid.unblocked_count(),
        scenario.steps(),
        scenario.start()
    );
    Ok((grid, scenario))
}

fn save_files(dir: &Path, grid: &TerrainGrid, scenario: &Scenario) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let grid_path = dir.join("grid.txt");
    let scenario_path = dir.join("scenario.txt");
    save_grid(&grid_path, grid)?;
    save_scenario(&scenario_path, scenario)?;
    info!("wrote {} and {}", grid_path.display(), scenario_path.display());
    Ok(())
}

fn filter(
    model: ModelConfig,
    grid: &TerrainGrid,
    scenario: &Scenario,
    trace_out: Option<&PathBuf>,
) -> Result<(), Box<dyn Error>> {
    scenario.validate_against(grid)?;

    let filter = BeliefFilter::new(model);
    let trace = filter.trace(grid, scenario.actions(), scenario.observations())?;
    let report = TrackingReport::new(&trace, scenario)?;

    for step in &report.steps {
        debug!(
            "step {:>4}: estimate {} (p={:.4}) truth {} (p={:.4}){}",
            step.step,
            step.estimate,
            step.estimate_probability,
            step.truth,
            step.truth_probability,
            if step.hit { " hit" } else { "" }
        );
    }

    if let Some(path) = trace_out {
        fs::write(path, trace.to_json()?)?;
        info!("wrote belief trace to {}", path.display());
    }

    if let Some(last) = report.steps.last() {
        println!(
            "final estimate {} (p={:.4}), truth {} (p={:.4})",
            last.estimate, last.estimate_probability, last.truth, last.truth_probability
        );
    }
    println!(
        "hit_rate={:.4} mean_truth_probability={:.4}",
        report.hit_rate(),
        report.mean_truth_probability()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logger(&cli.log_level)?;

    match cli.command {
        Command::Generate(args) => {
            let config = load_config(cli.config.as_ref(), Some(&args.overrides))?;
            let (grid, scenario) = generate(config)?;
            save_files(&args.output, &grid, &scenario)
        }
        Command::Filter(args) => {
            let config = load_config(cli.config.as_ref(), None)?;
            let grid = load_grid(&args.grid)?;
            let scenario = load_scenario(&args.scenario)?;
            info!(
                "loaded a {}x{} grid and a {}-step scenario",
                grid.rows(),
                grid.columns(),
                scenario.steps()
            );
            filter(config.model, &grid, &scenario, args.trace_out.as_ref())
        }
        Command::Run(args) => {
            let config = load_config(cli.config.as_ref(), Some(&args.overrides))?;
            let model = config.model;
            let (grid, scenario) = generate(config)?;
            if let Some(dir) = &args.output {
                save_files(dir, &grid, &scenario)?;
            }
            filter(model, &grid, &scenario, args.trace_out.as_ref())
        }
    }
}
