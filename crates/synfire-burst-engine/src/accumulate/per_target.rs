// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequential-per-target strategy.
//!
//! Targets are partitioned exclusively across workers, so every accumulator
//! slot has exactly one writer and no synchronization is needed. Each block
//! iterates the full spike list, caching index tiles in a fixed-size local
//! buffer, and keeps private running sums that are added to the shared
//! buffer once at the end. Memory-bandwidth bound on the weight reads.

use rayon::prelude::*;
use synfire_neural::{CurrentBuffer, Result, SourceId, SpikeList, WeightMatrix};

use super::{check_dims, DenseAccumulator, SPIKE_TILE, TARGET_BLOCK};

pub struct PerTargetAccumulator;

impl DenseAccumulator for PerTargetAccumulator {
    fn name(&self) -> &'static str {
        "sequential-per-target"
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
        currents
            .values_mut()
            .par_chunks_mut(TARGET_BLOCK)
            .enumerate()
            .for_each(|(block, out)| {
                let first = block * TARGET_BLOCK;
                let mut sums = [0.0f32; TARGET_BLOCK];
                let mut tile = [0u32; SPIKE_TILE];

                for chunk in indices.chunks(SPIKE_TILE) {
                    // Cache the spike indices locally; the whole block then
                    // streams weight rows against the cached tile.
                    let tile = &mut tile[..chunk.len()];
                    tile.copy_from_slice(chunk);

                    for &s in tile.iter() {
                        let row = &weights.row(SourceId(s))[first..first + out.len()];
                        for (sum, &w) in sums[..out.len()].iter_mut().zip(row) {
                            *sum += w;
                        }
                    }
                }

                for (acc, &sum) in out.iter_mut().zip(&sums[..]) {
                    *acc += sum;
                }
            });

        Ok(())
    }
}
