// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line driver for the synfire dense spike-propagation benchmark.
//!
//! `synfire <strategy-index> [population-size]` runs the fixed-count
//! timestep loop with the selected accumulation strategy and reports init
//! timings, the total accumulation-phase time and the observed vs expected
//! mean current on stdout. Diagnostics go to stderr through tracing.

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use synfire_burst_engine::{Simulation, SimulationReport, StrategyKind};
use synfire_neural::config::{DEFAULT_MEAN_INTERVAL, DEFAULT_TIMESTEPS};
use synfire_neural::SimulationConfig;

/// Dense spike-propagation benchmark
#[derive(Parser, Debug)]
#[command(name = "synfire", version, long_about = None)]
struct Args {
    /// Accumulation strategy index (0..=3)
    strategy: Option<usize>,

    /// Population size for both sources and targets
    #[arg(default_value_t = synfire_neural::config::DEFAULT_POPULATION)]
    population: usize,

    /// Number of timesteps to drive
    #[arg(long, default_value_t = DEFAULT_TIMESTEPS)]
    timesteps: u64,

    /// Mean inter-event interval per source, in timestep units
    #[arg(long, default_value_t = DEFAULT_MEAN_INTERVAL)]
    mean_interval: f32,

    /// Global RNG seed; fixed seed reproduces the same event sets
    #[arg(long, default_value_t = synfire_neural::config::DEFAULT_SEED)]
    seed: u64,
}

fn print_usage() {
    eprintln!("usage: synfire <strategy-index> [population-size]");
    eprintln!();
    eprintln!("strategies:");
    for kind in StrategyKind::ALL {
        eprintln!("  {}  {}", kind.index(), kind.name());
    }
}

fn print_report(report: &SimulationReport) {
    println!(
        "strategy {}  sources {}  targets {}",
        report.strategy, report.num_sources, report.num_targets
    );
    println!(
        "seed initialization: {:.3} ms",
        report.seed_init.as_secs_f64() * 1e3
    );
    println!(
        "interval initialization: {:.3} ms",
        report.interval_init.as_secs_f64() * 1e3
    );
    println!(
        "accumulation time: {:.3} ms",
        report.accumulation_time.as_secs_f64() * 1e3
    );
    println!(
        "mean current {:.3}  expected {:.3}",
        report.mean_current, report.expected_mean_current
    );
}

fn run(strategy_index: usize, args: &Args) -> synfire_neural::Result<SimulationReport> {
    let kind = StrategyKind::from_index(strategy_index)?;
    let config = SimulationConfig {
        num_sources: args.population,
        num_targets: args.population,
        mean_interval: args.mean_interval,
        timesteps: args.timesteps,
        seed: args.seed,
    };
    let mut simulation = Simulation::new(config, kind)?;
    simulation.run()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let Some(strategy_index) = args.strategy else {
        print_usage();
        std::process::exit(2);
    };

    match run(strategy_index, &args) {
        Ok(report) => print_report(&report),
        Err(err) => {
            error!("run failed: {err}");
            eprintln!("synfire: {err}");
            std::process::exit(1);
        }
    }
}
