// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Group-local-atomic strategy.
//!
//! Same 2D partitioning as global-atomic, but with a larger spike tile per
//! group. Workers inside a group combine their chunk partials into one
//! group-local accumulator first; a single representative then adds each
//! group total to the shared buffer. Contention drops by the number of
//! chunks per tile: one global atomic per (target, tile) instead of per
//! (target, chunk).

use rayon::prelude::*;
use synfire_neural::{atomic_add_f32, CurrentBuffer, Result, SourceId, SpikeList, WeightMatrix};

use super::{check_dims, DenseAccumulator, SPIKE_CHUNK, SPIKE_TILE, TARGET_BLOCK};

pub struct GroupLocalAccumulator;

impl DenseAccumulator for GroupLocalAccumulator {
    fn name(&self) -> &'static str {
        "group-local-atomic"
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
        let spike_tiles = indices.len().div_ceil(SPIKE_TILE);

        (0..target_blocks * spike_tiles)
            .into_par_iter()
            .for_each(|tile| {
                let tb = tile / spike_tiles;
                let st = tile % spike_tiles;
                let t0 = tb * TARGET_BLOCK;
                let t1 = (t0 + TARGET_BLOCK).min(num_targets);
                let s0 = st * SPIKE_TILE;
                let s1 = (s0 + SPIKE_TILE).min(indices.len());

                // Group-local accumulator, combined across the tile's chunks
                // before anything touches the shared buffer.
                let mut local = [0.0f32; TARGET_BLOCK];
                for chunk in indices[s0..s1].chunks(SPIKE_CHUNK) {
                    let mut partial = [0.0f32; TARGET_BLOCK];
                    for &s in chunk {
                        let row = &weights.row(SourceId(s))[t0..t1];
                        for (p, &w) in partial[..t1 - t0].iter_mut().zip(row) {
                            *p += w;
                        }
                    }
                    for (l, &p) in local[..t1 - t0].iter_mut().zip(&partial[..t1 - t0]) {
                        *l += p;
                    }
                }

                // One representative write per target per group.
                for (i, &l) in local[..t1 - t0].iter().enumerate() {
                    atomic_add_f32(&view[t0 + i], l);
                }
            });

        Ok(())
    }
}
