//! Headless raid runner for balance checks and CI verification.
//!
//! Runs RON raid scenarios without a game client and prints a JSON report
//! on stdout. Logs go to stderr.
//!
//! # Example
//!
//! ```bash
//! # Run a built-in scenario
//! cargo run -p raid_headless -- run --scenario barbarian_assault --seed 42
//!
//! # Run a scenario file and keep the fortification save
//! cargo run -p raid_headless -- run --scenario scenarios/pirate_landing.ron --save colony.bin
//!
//! # Verify determinism
//! cargo run -p raid_headless -- verify --scenario barbarian_assault --runs 5
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod runner;
pub mod scenario;

pub use runner::{RaidOutcome, RaidReport, ScenarioRunner, VerifyReport};
pub use scenario::{Scenario, ScenarioError};

/// Resolve a scenario argument: a built-in name or a RON file path.
///
/// # Errors
/// Returns an error if the argument is not a built-in name and the file
/// cannot be loaded.
pub fn resolve_scenario(arg: &str) -> Result<Scenario, ScenarioError> {
    match Scenario::builtin(arg) {
        Some(scenario) => Ok(scenario),
        None => Scenario::load(arg),
    }
}
