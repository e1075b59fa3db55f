// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Global-atomic strategy.
//!
//! 2D partition: one axis walks target blocks, the other walks spike chunks.
//! Every worker computes a partial sum over its chunk and publishes it with
//! a CAS add straight into the shared current buffer. Highest contention of
//! the four: one atomic per (target, spike-chunk) pair.

use rayon::prelude::*;
use synfire_neural::{atomic_add_f32, CurrentBuffer, Result, SourceId, SpikeList, WeightMatrix};

use super::{check_dims, DenseAccumulator, SPIKE_CHUNK, TARGET_BLOCK};

pub struct GlobalAtomicAccumulator;

impl DenseAccumulator for GlobalAtomicAccumulator {
    fn name(&self) -> &'static str {
        "global-atomic"
    }

    fn accumulate(
        &self,
        spikes: &SpikeList,
        weights: &WeightMatrix,
        currents: &mut CurrentBuffer,
    ) -> Result<()> {
        check_dims(spikes, weights, currents)?;
        if spikes.is_empty() {
            return Ok(());
        }

        let indices = spikes.indices();
        let num_targets = currents.len();
        let view = currents.atomic_view();

        let target_blocks = num_targets.div_ceil(TARGET_BLOCK);
        let spike_chunks = indices.len().div_ceil(SPIKE_CHUNK);

        (0..target_blocks * spike_chunks)
            .into_par_iter()
            .for_each(|tile| {
                let tb = tile / spike_chunks;
                let sc = tile % spike_chunks;
                let t0 = tb * TARGET_BLOCK;
                let t1 = (t0 + TARGET_BLOCK).min(num_targets);
                let s0 = sc * SPIKE_CHUNK;
                let s1 = (s0 + SPIKE_CHUNK).min(indices.len());

                let mut partial = [0.0f32; TARGET_BLOCK];
                for &s in &indices[s0..s1] {
                    let row = &weights.row(SourceId(s))[t0..t1];
                    for (p, &w) in partial[..t1 - t0].iter_mut().zip(row) {
                        *p += w;
                    }
                }

                for (i, &p) in partial[..t1 - t0].iter().enumerate() {
                    atomic_add_f32(&view[t0 + i], p);
                }
            });

        Ok(())
    }
}
