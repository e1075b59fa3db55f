// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Lane-transpose-reduce strategy.
//!
//! Targets are partitioned exclusively, so no atomics exist anywhere. Per
//! target, a lane-width array of partials is filled by striding the spike
//! list (the transpose staging buffer), then collapsed with an explicit
//! stride-halving tree reduction. On hardware with lock-step lane groups
//! this reduction is a shuffle; here it is the equivalent tree over local
//! memory. A single worker per target performs the one final write.

use rayon::prelude::*;
use synfire_neural::{CurrentBuffer, Result, SourceId, SpikeList, WeightMatrix};

use super::{check_dims, DenseAccumulator, LANE_WIDTH, TARGET_BLOCK};

pub struct LaneReduceAccumulator;

impl DenseAccumulator for LaneReduceAccumulator {
    fn name(&self) -> &'static str {
        "lane-transpose-reduce"
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
                let t0 = block * TARGET_BLOCK;
                for (i, acc) in out.iter_mut().enumerate() {
                    let t = t0 + i;

                    // Transpose staging: lane l accumulates spikes
                    // l, l + LANE_WIDTH, l + 2*LANE_WIDTH, ...
                    let mut lanes = [0.0f32; LANE_WIDTH];
                    for (j, &s) in indices.iter().enumerate() {
                        lanes[j % LANE_WIDTH] += weights.row(SourceId(s))[t];
                    }

                    // Tree reduction along the lane axis, stride halving.
                    let mut stride = LANE_WIDTH / 2;
                    while stride > 0 {
                        for l in 0..stride {
                            lanes[l] += lanes[l + stride];
                        }
                        stride /= 2;
                    }

                    *acc += lanes[0];
                }
            });

        Ok(())
    }
}
