// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Run orchestration.
//!
//! [`Simulation`] owns every buffer and the selected strategy for the
//! lifetime of one run: the source population, the compacted spike list,
//! the dense weight matrix and the shared current buffer. It drives the
//! fixed-count timestep loop, timing only the accumulation phase, and
//! reports the aggregate result at the end.
//!
//! The current buffer is never reset between timesteps: it accumulates over
//! the entire run. That cumulative behavior is part of the contract (the
//! expected-mean report formula depends on it); introducing a per-step reset
//! or a decay model would be a semantic change, not a cleanup.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use synfire_neural::{CurrentBuffer, Result, SimulationConfig, SpikeList, WeightMatrix};

use crate::accumulate::{DenseAccumulator, StrategyKind};
use crate::compaction::SpikeCompactor;
use crate::population::SourcePopulation;
use crate::rng_streams;
use crate::SimulationStats;

/// Final report of one run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub strategy: &'static str,
    pub num_sources: usize,
    pub num_targets: usize,
    /// Wall time to seed the per-source RNG streams.
    pub seed_init: Duration,
    /// Wall time to draw the initial countdown intervals.
    pub interval_init: Duration,
    /// Total accumulation-phase time across all timesteps. Event generation
    /// and compaction are excluded.
    pub accumulation_time: Duration,
    pub mean_current: f64,
    pub expected_mean_current: f64,
    pub stats: SimulationStats,
}

/// One configured simulation run.
pub struct Simulation {
    config: SimulationConfig,
    strategy: Box<dyn DenseAccumulator>,
    population: SourcePopulation,
    weights: WeightMatrix,
    spikes: SpikeList,
    currents: CurrentBuffer,
    compactor: SpikeCompactor,
    seed_init: Duration,
    interval_init: Duration,
    steps_run: u64,
    total_spikes: u64,
    accumulation_time: Duration,
}

impl Simulation {
    /// Allocate and initialize all run state. The weight matrix is filled
    /// from its own dedicated stream (sequence `num_sources`, right after
    /// the per-source streams) with uniform values in `[0, 2)` — mean 1.0,
    /// which makes the expected-mean report formula exact.
    pub fn new(config: SimulationConfig, kind: StrategyKind) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();
        let mut population =
            SourcePopulation::seed(config.num_sources, config.mean_interval, config.seed);
        let seed_init = start.elapsed();

        let start = Instant::now();
        population.draw_initial_intervals();
        let interval_init = start.elapsed();

        let mut weight_rng = rng_streams::stream(config.seed, config.num_sources as u64);
        let weights = WeightMatrix::from_fn(config.num_sources, config.num_targets, |_, _| {
            weight_rng.gen::<f32>() * 2.0
        });

        info!(
            strategy = kind.name(),
            sources = config.num_sources,
            targets = config.num_targets,
            timesteps = config.timesteps,
            seed = config.seed,
            "simulation initialized"
        );

        Ok(Self {
            spikes: SpikeList::with_capacity(config.num_sources),
            currents: CurrentBuffer::new(config.num_targets),
            strategy: kind.build(),
            population,
            weights,
            compactor: SpikeCompactor::new(),
            config,
            seed_init,
            interval_init,
            steps_run: 0,
            total_spikes: 0,
            accumulation_time: Duration::ZERO,
        })
    }

    /// Build a simulation around an existing weight matrix. Scenario tests
    /// use this with constant weights.
    pub fn with_weights(
        config: SimulationConfig,
        kind: StrategyKind,
        weights: WeightMatrix,
    ) -> Result<Self> {
        let mut sim = Self::new(config, kind)?;
        if weights.num_sources() != sim.config.num_sources
            || weights.num_targets() != sim.config.num_targets
        {
            return Err(synfire_neural::SynfireError::DimensionMismatch {
                expected: sim.config.num_sources * sim.config.num_targets,
                actual: weights.num_sources() * weights.num_targets(),
            });
        }
        sim.weights = weights;
        Ok(sim)
    }

    /// Advance one timestep: step sources, compact, accumulate. Returns the
    /// number of spikes emitted this step. Only the accumulation phase
    /// counts toward the timed total.
    pub fn step(&mut self) -> Result<usize> {
        self.spikes.clear();
        let flags = self.population.step();
        self.compactor.compact(flags, &mut self.spikes)?;

        let emitted = self.spikes.len();
        self.total_spikes += emitted as u64;

        let start = Instant::now();
        self.strategy
            .accumulate(&self.spikes, &self.weights, &mut self.currents)?;
        self.accumulation_time += start.elapsed();

        self.steps_run += 1;
        Ok(emitted)
    }

    /// Drive the configured number of timesteps and report.
    pub fn run(&mut self) -> Result<SimulationReport> {
        for step in 0..self.config.timesteps {
            let emitted = self.step()?;
            if step % 100 == 0 {
                debug!(step, emitted, "timestep complete");
            }
        }

        let report = self.report();
        info!(
            strategy = report.strategy,
            accumulation_ms = report.accumulation_time.as_secs_f64() * 1e3,
            mean_current = report.mean_current,
            expected = report.expected_mean_current,
            "run complete"
        );
        Ok(report)
    }

    /// Report over everything run so far.
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            strategy: self.strategy.name(),
            num_sources: self.config.num_sources,
            num_targets: self.config.num_targets,
            seed_init: self.seed_init,
            interval_init: self.interval_init,
            accumulation_time: self.accumulation_time,
            mean_current: self.currents.mean(),
            expected_mean_current: self.config.expected_mean_current(),
            stats: SimulationStats {
                total_timesteps: self.steps_run,
                total_spikes: self.total_spikes,
                total_accumulation_us: self.accumulation_time.as_micros() as u64,
            },
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spike list of the most recent timestep.
    pub fn spikes(&self) -> &SpikeList {
        &self.spikes
    }

    pub fn currents(&self) -> &CurrentBuffer {
        &self.currents
    }

    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Mutable population access for scenario tests that force countdowns.
    pub fn population_mut(&mut self) -> &mut SourcePopulation {
        &mut self.population
    }
}
