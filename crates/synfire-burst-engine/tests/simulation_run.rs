// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end simulation properties: spike-list invariants, fixed-seed
//! reproducibility and long-run statistical convergence.

use ahash::AHashSet;
use synfire_burst_engine::{Simulation, StrategyKind};
use synfire_neural::SimulationConfig;

fn config(population: usize, mean_interval: f32, timesteps: u64, seed: u64) -> SimulationConfig {
    SimulationConfig {
        num_sources: population,
        num_targets: population,
        mean_interval,
        timesteps,
        seed,
    }
}

#[test]
fn spike_list_bounded_and_distinct_every_step() {
    let mut sim = Simulation::new(config(300, 3.0, 0, 21), StrategyKind::GlobalAtomic).unwrap();
    for _ in 0..50 {
        let emitted = sim.step().unwrap();
        assert!(emitted <= 300);
        let unique: AHashSet<u32> = sim.spikes().indices().iter().copied().collect();
        assert_eq!(unique.len(), emitted, "duplicate spike index emitted");
        assert!(sim.spikes().indices().iter().all(|&s| s < 300));
    }
}

#[test]
fn fixed_seed_reproduces_event_sets() {
    let mut a = Simulation::new(config(200, 5.0, 0, 99), StrategyKind::PerTarget).unwrap();
    let mut b = Simulation::new(config(200, 5.0, 0, 99), StrategyKind::LaneReduce).unwrap();
    for step in 0..80 {
        a.step().unwrap();
        b.step().unwrap();
        // List order is block-major and scheduling-dependent; the SET is
        // what determinism guarantees.
        let mut sa = a.spikes().indices().to_vec();
        let mut sb = b.spikes().indices().to_vec();
        sa.sort_unstable();
        sb.sort_unstable();
        assert_eq!(sa, sb, "event sets diverged at step {step}");
    }
}

#[test]
fn different_seeds_produce_different_runs() {
    let mut a = Simulation::new(config(200, 5.0, 50, 1), StrategyKind::PerTarget).unwrap();
    let mut b = Simulation::new(config(200, 5.0, 50, 2), StrategyKind::PerTarget).unwrap();
    let ra = a.run().unwrap();
    let rb = b.run().unwrap();
    assert_ne!(ra.mean_current, rb.mean_current);
}

#[test]
fn all_strategies_reach_the_same_mean_current() {
    let mut means = Vec::new();
    for kind in StrategyKind::ALL {
        let mut sim = Simulation::new(config(256, 6.0, 100, 777), kind).unwrap();
        let report = sim.run().unwrap();
        means.push(report.mean_current);
    }
    for pair in means.windows(2) {
        let scale = pair[0].abs().max(1.0);
        assert!(
            (pair[0] - pair[1]).abs() / scale < 1e-3,
            "strategy means diverge: {means:?}"
        );
    }
}

#[test]
fn long_run_mean_current_converges_to_expected() {
    let mut sim = Simulation::new(config(256, 8.0, 1_000, 4242), StrategyKind::GroupLocalAtomic)
        .unwrap();
    let report = sim.run().unwrap();

    // expected = num_sources * timesteps / mean_interval = 256 * 125
    assert_eq!(report.expected_mean_current, 32_000.0);
    let rel = (report.mean_current - report.expected_mean_current).abs()
        / report.expected_mean_current;
    assert!(
        rel < 0.05,
        "mean current {} vs expected {} (rel {rel})",
        report.mean_current,
        report.expected_mean_current
    );

    // Per-source event rate converges toward 1/mean_interval as well.
    let rate = report.stats.total_spikes as f64 / (256.0 * 1_000.0);
    assert!((rate - 0.125).abs() / 0.125 < 0.05, "event rate {rate}");
}

#[test]
fn forced_silence_leaves_currents_unchanged() {
    let mut sim = Simulation::new(config(64, 4.0, 0, 8), StrategyKind::GlobalAtomic).unwrap();
    // Push every countdown far into the future: no source can fire.
    sim.population_mut().countdowns_mut().fill(1e9);
    let before = sim.currents().values().to_vec();
    for _ in 0..10 {
        assert_eq!(sim.step().unwrap(), 0);
    }
    assert_eq!(sim.currents().values(), &before[..]);
}

#[test]
fn report_timings_are_populated() {
    let mut sim = Simulation::new(config(128, 4.0, 10, 3), StrategyKind::PerTarget).unwrap();
    let report = sim.run().unwrap();
    assert_eq!(report.stats.total_timesteps, 10);
    assert_eq!(report.num_sources, 128);
    assert_eq!(report.num_targets, 128);
    assert_eq!(report.strategy, "sequential-per-target");
    // Durations exist even when tiny; accumulation ran 10 times.
    assert!(report.accumulation_time >= std::time::Duration::ZERO);
}
