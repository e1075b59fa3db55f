// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Source population stepping.
//!
//! Structure-of-Arrays per-source state: mean interval, countdown-to-next-
//! event and the owned RNG stream. Each timestep every source decrements its
//! countdown by exactly one unit; a source whose countdown was already at or
//! below zero emits an event and refreshes the countdown with
//! `mean_interval * Exp(1)`. Sources never interact, so the update runs as a
//! plain parallel sweep over disjoint state.

use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::exponential::sample_unit_exponential;
use crate::rng_streams;

/// Per-source state plus the reusable event-flag scratch buffer.
#[derive(Debug)]
pub struct SourcePopulation {
    mean_intervals: Vec<f32>,
    countdowns: Vec<f32>,
    streams: Vec<StdRng>,
    flags: Vec<bool>,
}

impl SourcePopulation {
    /// Seed one independent RNG stream per source (sequence numbers
    /// `0..num_sources`). Countdowns start at zero until
    /// [`SourcePopulation::draw_initial_intervals`] runs, so every source
    /// would fire on the first step of an un-initialized population.
    pub fn seed(num_sources: usize, mean_interval: f32, seed: u64) -> Self {
        Self {
            mean_intervals: vec![mean_interval; num_sources],
            countdowns: vec![0.0; num_sources],
            streams: rng_streams::seed_streams(seed, 0, num_sources),
            flags: vec![false; num_sources],
        }
    }

    /// Draw the initial countdown for every source from its own stream.
    pub fn draw_initial_intervals(&mut self) {
        self.countdowns
            .par_iter_mut()
            .zip(self.mean_intervals.par_iter())
            .zip(self.streams.par_iter_mut())
            .for_each(|((countdown, &mean), rng)| {
                *countdown = mean * sample_unit_exponential(rng);
            });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.countdowns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.countdowns.is_empty()
    }

    /// Advance every source by one timestep. Returns the per-source event
    /// flags for this step; the returned slice is valid until the next call.
    pub fn step(&mut self) -> &[bool] {
        self.flags
            .par_iter_mut()
            .zip(self.countdowns.par_iter_mut())
            .zip(self.mean_intervals.par_iter())
            .zip(self.streams.par_iter_mut())
            .for_each(|(((flag, countdown), &mean), rng)| {
                *flag = *countdown <= 0.0;
                if *flag {
                    *countdown += mean * sample_unit_exponential(rng);
                }
                // One time unit elapses every step, event or not.
                *countdown -= 1.0;
            });
        &self.flags
    }

    /// Current countdowns. Mutable access exists so scenario tests can force
    /// a known firing pattern.
    pub fn countdowns(&self) -> &[f32] {
        &self.countdowns
    }

    pub fn countdowns_mut(&mut self) -> &mut [f32] {
        &mut self.countdowns
    }
}
