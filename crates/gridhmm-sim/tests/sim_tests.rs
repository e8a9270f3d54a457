use gridhmm_core::{
    Action, BeliefFilter, FilterError, ModelConfig, Observation, Position, TerrainGrid, TerrainKind,
};
use gridhmm_sim::{
    GenerationConfig, ScenarioGenerator, SimError, TerrainThresholds, TrackingReport,
    generate_grid, generate_scenario, parse_grid, parse_scenario, write_grid, write_scenario,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn small_config(seed: u64) -> GenerationConfig {
    GenerationConfig {
        rows: 6,
        columns: 7,
        steps: 40,
        seed,
        ..GenerationConfig::default()
    }
}

#[test]
fn default_generation_yaml_parses() {
    let config = GenerationConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config.steps, 100);
    assert_eq!(config.terrain, TerrainThresholds::default());
    assert_eq!(config.model, ModelConfig::default());
}

#[test]
fn decreasing_thresholds_are_rejected() {
    let yaml = r#"
terrain:
  normal_max: 0.8
  highway_max: 0.7
"#;
    let err = GenerationConfig::from_yaml_str(yaml).expect_err("should fail");
    assert!(err.to_string().contains("non-decreasing"));
}

#[test]
fn thresholds_are_inclusive_upper_bounds() {
    let thresholds = TerrainThresholds::default();
    assert_eq!(thresholds.classify(0.0), TerrainKind::Normal);
    assert_eq!(thresholds.classify(0.5), TerrainKind::Normal);
    assert_eq!(thresholds.classify(0.6), TerrainKind::Highway);
    assert_eq!(thresholds.classify(0.7), TerrainKind::Highway);
    assert_eq!(thresholds.classify(0.9), TerrainKind::HardToTraverse);
    assert_eq!(thresholds.classify(0.95), TerrainKind::Blocked);
}

#[test]
fn grid_generation_is_deterministic_for_fixed_seed() {
    let mut rng_a = ChaCha8Rng::seed_from_u64(42);
    let mut rng_b = ChaCha8Rng::seed_from_u64(42);

    let a = generate_grid(8, 9, &mut rng_a).expect("grid");
    let b = generate_grid(8, 9, &mut rng_b).expect("grid");

    assert_eq!(a, b);
    assert_eq!(a.dimensions(), (8, 9));
}

#[test]
fn generated_walk_is_consistent_with_the_grid() {
    let mut generator = ScenarioGenerator::new(small_config(7)).expect("valid config");
    let grid = generator.grid().expect("grid");
    let scenario = generator.scenario(&grid).expect("scenario");

    assert_eq!(scenario.steps(), 40);
    assert_eq!(scenario.positions().len(), 41);
    assert_eq!(scenario.observations().len(), 40);
    scenario.validate_against(&grid).expect("walk stays on open cells");

    for (t, action) in scenario.actions().iter().enumerate() {
        let from = scenario.positions()[t];
        let to = scenario.positions()[t + 1];
        assert!(
            to == from || grid.open_neighbor(from, *action) == Some(to),
            "step {t}: {from} -> {to} is not reachable with {action:?}"
        );
    }
}

#[test]
fn scenario_generation_is_deterministic_for_fixed_seed() {
    let mut a = ScenarioGenerator::new(small_config(99)).expect("valid config");
    let mut b = ScenarioGenerator::new(small_config(99)).expect("valid config");

    let grid_a = a.grid().expect("grid");
    let grid_b = b.grid().expect("grid");
    assert_eq!(grid_a, grid_b);
    assert_eq!(
        a.scenario(&grid_a).expect("scenario"),
        b.scenario(&grid_b).expect("scenario")
    );
}

#[test]
fn all_blocked_grid_cannot_host_a_scenario() {
    let grid = TerrainGrid::filled(5, 10, TerrainKind::Blocked).expect("valid grid");
    let before = grid.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let err = generate_scenario(&grid, &ModelConfig::default(), 100, &mut rng)
        .expect_err("nowhere to start");

    assert_eq!(err, FilterError::NoUnblockedCells);
    assert_eq!(err.to_string(), "No unblocked cells exist");
    assert_eq!(grid, before);
}

#[test]
fn single_cell_agent_never_moves_and_sensor_is_mostly_right() {
    let grid = TerrainGrid::filled(1, 1, TerrainKind::Highway).expect("valid grid");
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let scenario =
        generate_scenario(&grid, &ModelConfig::default(), 20_000, &mut rng).expect("scenario");

    assert!(scenario.positions().iter().all(|p| *p == Position::new(0, 0)));
    let correct = scenario
        .observations()
        .iter()
        .filter(|o| **o == Observation::Highway)
        .count() as f64
        / 20_000.0;
    assert!((0.87..0.93).contains(&correct), "sensor accuracy {correct}");
}

#[test]
fn intended_moves_succeed_about_nine_times_in_ten() {
    let grid = TerrainGrid::filled(1, 2, TerrainKind::Normal).expect("valid grid");
    let mut rng = ChaCha8Rng::seed_from_u64(77);

    let scenario =
        generate_scenario(&grid, &ModelConfig::default(), 20_000, &mut rng).expect("scenario");

    let mut attempts = 0usize;
    let mut moves = 0usize;
    for (t, action) in scenario.actions().iter().enumerate() {
        let from = scenario.positions()[t];
        let to = scenario.positions()[t + 1];
        match grid.open_neighbor(from, *action) {
            Some(next) => {
                attempts += 1;
                if to == next {
                    moves += 1;
                } else {
                    assert_eq!(to, from, "step {t}: agent slid to {to}");
                }
            }
            None => assert_eq!(to, from, "step {t}: {action:?} leaves the grid"),
        }
    }

    assert!(attempts > 5_000, "only {attempts} possible moves");
    let rate = moves as f64 / attempts as f64;
    assert!((0.87..0.93).contains(&rate), "move success rate {rate}");
}

#[test]
fn wrong_readings_are_split_between_the_other_kinds() {
    let grid = TerrainGrid::filled(1, 1, TerrainKind::HardToTraverse).expect("valid grid");
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let scenario =
        generate_scenario(&grid, &ModelConfig::default(), 20_000, &mut rng).expect("scenario");

    let wrong: Vec<Observation> = scenario
        .observations()
        .iter()
        .copied()
        .filter(|o| *o != Observation::HardToTraverse)
        .collect();
    let normal = wrong.iter().filter(|o| **o == Observation::Normal).count();
    let highway = wrong.iter().filter(|o| **o == Observation::Highway).count();

    assert_eq!(normal + highway, wrong.len());
    assert!(normal > wrong.len() / 3, "{normal} of {} wrong readings were N", wrong.len());
    assert!(highway > wrong.len() / 3, "{highway} of {} wrong readings were H", wrong.len());
}

#[test]
fn oversized_dimensions_are_errors_not_panics() {
    let huge = parse_grid("99999999999 99999999999\n").expect_err("product overflows");
    assert!(matches!(huge, SimError::Parse { line: 1, .. }));

    let short = parse_grid("100000 100000\n1 1 N\n").expect_err("body far too short");
    assert!(matches!(short, SimError::Parse { line: 1, .. }));

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let err = generate_grid(usize::MAX, 2, &mut rng).expect_err("product overflows");
    assert!(matches!(err, FilterError::TooLarge { .. }));
}

#[test]
fn grid_file_is_one_indexed() {
    let grid = TerrainGrid::from_rows(vec![
        vec![TerrainKind::Normal, TerrainKind::Highway],
        vec![TerrainKind::HardToTraverse, TerrainKind::Blocked],
    ])
    .expect("valid grid");

    let mut out = Vec::new();
    write_grid(&grid, &mut out).expect("write");
    let text = String::from_utf8(out).expect("utf8");

    assert_eq!(text, "2 2\n1 1 N\n1 2 H\n2 1 T\n2 2 B\n");
    assert_eq!(parse_grid(&text).expect("parse"), grid);
}

#[test]
fn grid_parser_accepts_cells_in_any_order() {
    let grid = parse_grid("1 3\n1 3 B\n1 1 H\n1 2 T\n").expect("parse");
    assert_eq!(
        grid.cells(),
        &[TerrainKind::Highway, TerrainKind::HardToTraverse, TerrainKind::Blocked]
    );
}

#[test]
fn grid_parser_rejects_incomplete_or_invalid_files() {
    let missing = parse_grid("1 2\n1 1 N\n").expect_err("cell 1 2 missing");
    assert!(matches!(missing, SimError::Parse { .. }));

    let duplicate = parse_grid("1 2\n1 1 N\n1 1 H\n1 2 N\n").expect_err("duplicate");
    assert!(matches!(duplicate, SimError::Parse { line: 3, .. }));

    let bad_code = parse_grid("1 1\n1 1 X\n").expect_err("bad code");
    assert!(matches!(bad_code, SimError::Parse { line: 2, .. }));

    let out_of_range = parse_grid("1 1\n0 1 N\n").expect_err("zero index");
    assert!(matches!(out_of_range, SimError::Parse { line: 2, .. }));
}

#[test]
fn scenario_file_layout() {
    let text = "1 1\n1 2\n1 2\nRU\nHN\n";
    let scenario = parse_scenario(text).expect("parse");

    assert_eq!(scenario.start(), Position::new(0, 0));
    assert_eq!(scenario.actions(), &[Action::Right, Action::Up]);
    assert_eq!(
        scenario.observations(),
        &[Observation::Highway, Observation::Normal]
    );

    let mut out = Vec::new();
    write_scenario(&scenario, &mut out).expect("write");
    assert_eq!(String::from_utf8(out).expect("utf8"), text);
}

#[test]
fn scenario_parser_ignores_trailing_blank_lines() {
    let scenario = parse_scenario("1 1\n1 2\nR\nH\n\n\n").expect("parse");
    assert_eq!(scenario.positions(), &[Position::new(0, 0), Position::new(0, 1)]);
    assert_eq!(scenario.actions(), &[Action::Right]);
    assert_eq!(scenario.observations(), &[Observation::Highway]);

    let empty_walk = parse_scenario("2 3\n\n\n\n").expect("zero steps");
    assert_eq!(empty_walk.start(), Position::new(1, 2));
    assert_eq!(empty_walk.steps(), 0);

    let mut out = Vec::new();
    write_scenario(&empty_walk, &mut out).expect("write");
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text, "2 3\n\n\n");
    assert_eq!(parse_scenario(&text).expect("parse"), empty_walk);
}

#[test]
fn scenario_parser_rejects_blocked_readings_and_bad_lengths() {
    let blocked = parse_scenario("1 1\n1 1\nU\nB\n").expect_err("B is not a reading");
    assert!(matches!(blocked, SimError::Parse { line: 4, .. }));

    let short = parse_scenario("1 1\nUU\nNN\n").expect_err("two actions, one position");
    assert!(matches!(
        short,
        SimError::Filter(FilterError::ScenarioLength { .. })
    ));
}

#[test]
fn files_survive_a_trip_through_disk() {
    let dir = std::env::temp_dir().join(format!("gridhmm-sim-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let mut generator = ScenarioGenerator::new(small_config(3)).expect("valid config");
    let grid = generator.grid().expect("grid");
    let scenario = generator.scenario(&grid).expect("scenario");

    let grid_path = dir.join("grid.txt");
    let scenario_path = dir.join("scenario.txt");
    gridhmm_sim::save_grid(&grid_path, &grid).expect("save grid");
    gridhmm_sim::save_scenario(&scenario_path, &scenario).expect("save scenario");

    assert_eq!(gridhmm_sim::load_grid(&grid_path).expect("load grid"), grid);
    assert_eq!(
        gridhmm_sim::load_scenario(&scenario_path).expect("load scenario"),
        scenario
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn report_has_one_entry_per_step() {
    let mut generator = ScenarioGenerator::new(small_config(11)).expect("valid config");
    let grid = generator.grid().expect("grid");
    let scenario = generator.scenario(&grid).expect("scenario");

    let trace = BeliefFilter::new(generator.config().model)
        .trace(&grid, scenario.actions(), scenario.observations())
        .expect("trace");
    let report = TrackingReport::new(&trace, &scenario).expect("report");

    assert_eq!(report.steps.len(), scenario.steps());
    assert_eq!(report.steps[0].step, 1);
    assert!((0.0..=1.0).contains(&report.hit_rate()));
    assert!(report.mean_truth_probability() > 0.0);
}

proptest! {
    #[test]
    fn generated_scenarios_filter_the_same_when_split(seed in any::<u64>(), split in 0usize..=40) {
        let mut generator = ScenarioGenerator::new(small_config(seed)).expect("valid config");
        let grid = generator.grid().expect("grid");
        prop_assume!(grid.unblocked_count() > 0);
        let scenario = generator.scenario(&grid).expect("scenario");

        let filter = BeliefFilter::new(generator.config().model);
        let actions = scenario.actions();
        let observations = scenario.observations();
        let n = scenario.steps();
        let prior = filter.initial_belief(&grid).expect("prior");

        let direct = filter
            .run(&grid, actions, observations, 0..n, prior.clone())
            .expect("direct run");
        let halfway = filter
            .run(&grid, actions, observations, 0..split, prior)
            .expect("first half");
        let resumed = filter
            .run(&grid, actions, observations, split..n, halfway)
            .expect("second half");

        prop_assert_eq!(direct.as_slice(), resumed.as_slice());
        prop_assert!((direct.total() - 1.0).abs() < 1e-9);
    }
}
