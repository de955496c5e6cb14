//! Headless raid runner.
//!
//! # Usage
//!
//! ```bash
//! # Run a scenario and print the JSON report
//! cargo run -p raid_headless -- run --scenario barbarian_assault --seed 42
//!
//! # Verify determinism by running the same seed multiple times
//! cargo run -p raid_headless -- verify --scenario pirate_landing --runs 5
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use raid_core::persistence::ColonySave;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use raid_headless::{resolve_scenario, ScenarioRunner};

#[derive(Parser)]
#[command(name = "raid_headless")]
#[command(about = "Headless raid scenario runner for balance checks and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario once and print the report
    Run {
        /// Built-in scenario name or RON file
        #[arg(short, long, default_value = "barbarian_assault")]
        scenario: String,

        /// Random seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Write the fortification save to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Verify determinism by running same seed multiple times
    Verify {
        /// Built-in scenario name or RON file
        #[arg(short, long, default_value = "barbarian_assault")]
        scenario: String,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for the report)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            seed,
            save,
        } => cmd_run(&scenario, seed, save),
        Commands::Verify {
            scenario,
            seed,
            runs,
        } => cmd_verify(&scenario, seed, runs),
    }
}

/// Run a scenario once
fn cmd_run(scenario: &str, seed: u64, save: Option<PathBuf>) {
    let scenario = load_or_exit(scenario);
    let outcome = match ScenarioRunner::new().run(&scenario, seed) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Scenario failed");
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = save {
        if let Err(e) = ColonySave::capture(&outcome.structures).save(&path) {
            tracing::error!(error = %e, path = %path.display(), "Failed to save fortifications");
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
        tracing::info!(path = %path.display(), "Saved fortifications");
    }

    print_json(&outcome.report);
}

/// Verify determinism
fn cmd_verify(scenario: &str, seed: u64, runs: u32) {
    let scenario = load_or_exit(scenario);
    let report = match ScenarioRunner::new().verify(&scenario, seed, runs) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Verification failed");
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    print_json(&report);
    if !report.deterministic {
        eprintln!("FAIL: {} runs produced differing hashes", report.hashes.len());
        std::process::exit(2);
    }
    eprintln!("PASS: {} runs matched", report.hashes.len());
}

fn load_or_exit(arg: &str) -> raid_headless::Scenario {
    match resolve_scenario(arg) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!(error = %e, scenario = arg, "Failed to load scenario");
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode report");
            std::process::exit(1);
        }
    }
}
