// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! # synfire-burst-engine
//!
//! Timestep-driven dense spike-propagation engine.
//!
//! Each timestep, a population of stochastic sources emits events; the
//! emitted source indices are compacted into one dense list; the matching
//! rows of a dense weight matrix are then added into a shared per-target
//! current buffer by one of four interchangeable accumulation strategies.
//! The strategies trade synchronization granularity against memory traffic
//! and atomic contention; all produce numerically equivalent sums up to
//! floating-point reordering.
//!
//! ## Architecture
//! - Rayon for all data-parallel phases
//! - Fixed-size worker groups model the block structure of the design
//! - Lock-free f32 accumulation where partitions overlap
//! - Minimal allocations in hot paths

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod accumulate;
pub mod compaction;
pub mod exponential;
pub mod orchestrator;
pub mod population;
pub mod rng_streams;

pub use accumulate::{DenseAccumulator, StrategyKind};
pub use compaction::SpikeCompactor;
pub use exponential::sample_unit_exponential;
pub use orchestrator::{Simulation, SimulationReport};
pub use population::SourcePopulation;
pub use rng_streams::seed_streams;

/// Aggregate statistics over one simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub total_timesteps: u64,
    pub total_spikes: u64,
    pub total_accumulation_us: u64,
}

impl SimulationStats {
    /// Average emitted spikes per timestep.
    pub fn avg_spikes_per_timestep(&self) -> f64 {
        if self.total_timesteps == 0 {
            0.0
        } else {
            self.total_spikes as f64 / self.total_timesteps as f64
        }
    }

    /// Average accumulation-phase time per timestep (microseconds).
    pub fn avg_accumulation_us(&self) -> f64 {
        if self.total_timesteps == 0 {
            0.0
        } else {
            self.total_accumulation_us as f64 / self.total_timesteps as f64
        }
    }
}
