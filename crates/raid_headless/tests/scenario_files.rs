//! Runs the shipped scenario files end to end.

use std::path::PathBuf;

use raid_headless::{resolve_scenario, Scenario, ScenarioRunner};
use raid_test_utils::determinism::verify_determinism;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn test_shipped_scenarios_parse() {
    for name in ["pirate_landing.ron", "hard_siege.ron"] {
        let scenario = Scenario::load(scenario_path(name)).unwrap();
        assert!(!scenario.waves.is_empty(), "{name} has no waves");
    }
}

#[test]
fn test_pirate_file_matches_builtin() {
    let runner = ScenarioRunner::new();
    let file = Scenario::load(scenario_path("pirate_landing.ron")).unwrap();

    let from_file = runner.run(&file, 11).unwrap().report;
    let builtin = runner.run(&Scenario::pirate_landing(), 11).unwrap().report;

    assert_eq!(from_file.state_hash, builtin.state_hash);
}

#[test]
fn test_hard_siege_outcome() {
    let scenario = resolve_scenario(scenario_path("hard_siege.ron").to_str().unwrap()).unwrap();
    let report = ScenarioRunner::new().run(&scenario, 3).unwrap().report;

    assert_eq!(report.spawned, 37);
    assert_eq!(report.attacking_settlement, 32);
    // (5 + 3 + 3 + 2 + 2) / 5 = 3
    assert_eq!(report.fortifications[0].claim_radius, 3);
    // (20 + 50) * 15 / 10 = 105
    assert!(report.raiders.iter().filter(|r| r.role != "chief").any(|r| r.max_health == 105.0));
}

#[test]
fn test_hard_siege_is_deterministic() {
    let scenario = Scenario::load(scenario_path("hard_siege.ron")).unwrap();
    let runner = ScenarioRunner::new();

    let result = verify_determinism(
        3,
        || runner.run(&scenario, 2024).unwrap(),
        |outcome| outcome.report.state_hash,
    );
    result.assert_deterministic();
}
