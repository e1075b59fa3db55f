// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense accumulation strategies.
//!
//! Shared contract: given the compacted spike list and the weight matrix,
//! add `sum over emitted sources s of weight[s][t]` into `current[t]` for
//! every target `t`. The four implementations partition the work
//! differently and pay for it with different synchronization:
//!
//! | strategy              | partitioning            | reduction           |
//! |-----------------------|-------------------------|---------------------|
//! | sequential-per-target | exclusive target blocks | private running sum |
//! | global-atomic         | spike-chunk x target    | CAS per pair        |
//! | group-local-atomic    | spike-tile x target     | local, CAS per tile |
//! | lane-transpose-reduce | exclusive target blocks | lane tree reduction |
//!
//! All strategies must treat a zero-length spike list as a strict no-op,
//! truncate partial final spike tiles correctly, and never touch targets
//! past the end of a partial final target block. Accumulation is f32, so
//! results differ at the bit level with reordering but agree within a small
//! relative tolerance.

mod global_atomic;
mod group_local;
mod lane_reduce;
mod per_target;

pub use global_atomic::GlobalAtomicAccumulator;
pub use group_local::GroupLocalAccumulator;
pub use lane_reduce::LaneReduceAccumulator;
pub use per_target::PerTargetAccumulator;

use core::fmt;

use synfire_neural::{CurrentBuffer, Result, SpikeList, SynfireError, WeightMatrix};

/// Targets per worker block.
pub const TARGET_BLOCK: usize = 128;

/// Spike indices cached per local tile (group-local strategy, per-target
/// strategy's index cache).
pub const SPIKE_TILE: usize = 256;

/// Spike subset per 2D worker (global-atomic strategy, and the sub-chunks
/// combined locally by the group-local strategy).
pub const SPIKE_CHUNK: usize = 32;

/// Lanes in the transpose-reduce staging buffer. Must be a power of two for
/// the stride-halving reduction and must divide the tile width, mirroring
/// the lane-group divisibility requirement of the lock-step design.
pub const LANE_WIDTH: usize = 32;

const _: () = assert!(LANE_WIDTH.is_power_of_two());
const _: () = assert!(TARGET_BLOCK % LANE_WIDTH == 0);
const _: () = assert!(SPIKE_TILE % SPIKE_CHUNK == 0);

/// One dense accumulation strategy. Chosen once at startup and invoked
/// uniformly by the orchestrator; adding a strategy means adding a variant
/// here, not touching orchestrator logic.
pub trait DenseAccumulator: Send + Sync {
    fn name(&self) -> &'static str;

    /// `current[t] += sum over s in spikes of weight[s][t]`.
    fn accumulate(
        &self,
        spikes: &SpikeList,
        weights: &WeightMatrix,
        currents: &mut CurrentBuffer,
    ) -> Result<()>;
}

/// Buffer-shape check shared by all strategies.
pub(crate) fn check_dims(
    spikes: &SpikeList,
    weights: &WeightMatrix,
    currents: &CurrentBuffer,
) -> Result<()> {
    if weights.num_targets() != currents.len() {
        return Err(SynfireError::DimensionMismatch {
            expected: weights.num_targets(),
            actual: currents.len(),
        });
    }
    if spikes.capacity() > weights.num_sources() {
        return Err(SynfireError::DimensionMismatch {
            expected: weights.num_sources(),
            actual: spikes.capacity(),
        });
    }
    Ok(())
}

/// The four accumulation strategies, indexable as on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    PerTarget,
    GlobalAtomic,
    GroupLocalAtomic,
    LaneReduce,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::PerTarget,
        StrategyKind::GlobalAtomic,
        StrategyKind::GroupLocalAtomic,
        StrategyKind::LaneReduce,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(SynfireError::InvalidStrategy {
                index,
                max: Self::ALL.len() - 1,
            })
    }

    pub fn index(self) -> usize {
        match self {
            StrategyKind::PerTarget => 0,
            StrategyKind::GlobalAtomic => 1,
            StrategyKind::GroupLocalAtomic => 2,
            StrategyKind::LaneReduce => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::PerTarget => "sequential-per-target",
            StrategyKind::GlobalAtomic => "global-atomic",
            StrategyKind::GroupLocalAtomic => "group-local-atomic",
            StrategyKind::LaneReduce => "lane-transpose-reduce",
        }
    }

    /// Instantiate the strategy.
    pub fn build(self) -> Box<dyn DenseAccumulator> {
        match self {
            StrategyKind::PerTarget => Box::new(PerTargetAccumulator),
            StrategyKind::GlobalAtomic => Box::new(GlobalAtomicAccumulator),
            StrategyKind::GroupLocalAtomic => Box::new(GroupLocalAccumulator),
            StrategyKind::LaneReduce => Box::new(LaneReduceAccumulator),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
