// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation configuration.
//!
//! The RNG seed is an explicit configuration value rather than a process-wide
//! constant so determinism stays testable per run: two configs with the same
//! seed produce bit-identical spike sets.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynfireError};

/// Default population size for both sources and targets.
pub const DEFAULT_POPULATION: usize = 10_000;

/// Default number of timesteps per run.
pub const DEFAULT_TIMESTEPS: u64 = 1_000;

/// Default mean inter-event interval, in timestep units (dt = 1).
pub const DEFAULT_MEAN_INTERVAL: f32 = 10.0;

/// Default global RNG seed.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Full configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of event-emitting sources.
    pub num_sources: usize,
    /// Number of current-accumulating targets.
    pub num_targets: usize,
    /// Mean inter-event interval per source, in timestep units.
    pub mean_interval: f32,
    /// Number of timesteps to drive.
    pub timesteps: u64,
    /// Global seed from which all per-source streams are derived.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_sources: DEFAULT_POPULATION,
            num_targets: DEFAULT_POPULATION,
            mean_interval: DEFAULT_MEAN_INTERVAL,
            timesteps: DEFAULT_TIMESTEPS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Config with both populations set to `population`, defaults elsewhere.
    pub fn with_population(population: usize) -> Self {
        Self {
            num_sources: population,
            num_targets: population,
            ..Self::default()
        }
    }

    /// Validate the configuration. Called once before buffers are allocated.
    pub fn validate(&self) -> Result<()> {
        if self.num_sources == 0 {
            return Err(SynfireError::InvalidConfiguration(
                "num_sources must be positive".into(),
            ));
        }
        if self.num_targets == 0 {
            return Err(SynfireError::InvalidConfiguration(
                "num_targets must be positive".into(),
            ));
        }
        if self.num_sources > u32::MAX as usize || self.num_targets > u32::MAX as usize {
            return Err(SynfireError::InvalidConfiguration(
                "population sizes must fit in u32 indices".into(),
            ));
        }
        if !self.mean_interval.is_finite() || self.mean_interval <= 0.0 {
            return Err(SynfireError::InvalidConfiguration(
                "mean_interval must be finite and > 0".into(),
            ));
        }
        Ok(())
    }

    /// Analytically expected mean current at the end of the run.
    ///
    /// Each source emits ~`timesteps / mean_interval` events over the run and
    /// weights are drawn with mean 1.0, so every target accumulates
    /// ~`num_sources * timesteps / mean_interval`.
    pub fn expected_mean_current(&self) -> f64 {
        self.num_sources as f64 * self.timesteps as f64 / self.mean_interval as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_sources, DEFAULT_POPULATION);
        assert_eq!(config.num_targets, DEFAULT_POPULATION);
    }

    #[test]
    fn rejects_zero_population() {
        let config = SimulationConfig::with_population(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_mean_interval() {
        let mut config = SimulationConfig::default();
        config.mean_interval = 0.0;
        assert!(config.validate().is_err());
        config.mean_interval = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn expected_mean_matches_rate_formula() {
        let config = SimulationConfig {
            num_sources: 10_000,
            num_targets: 10_000,
            mean_interval: 10.0,
            timesteps: 1_000,
            seed: 1,
        };
        // 10000 sources * 100 events each over the run
        assert_eq!(config.expected_mean_current(), 1_000_000.0);
    }
}
