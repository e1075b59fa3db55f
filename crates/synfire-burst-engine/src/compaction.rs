// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Spike compaction: per-source event flags to one dense index list.
//!
//! Two-phase group protocol. Sources are partitioned into fixed-size groups;
//! each group first collects its flagged indices into a group-local buffer
//! (a rayon task IS the group, so local slot assignment needs no atomic),
//! then reserves a contiguous region of the global list with one
//! `fetch_add` on the shared cursor, then copies its indices into the
//! reserved region. Regions never overlap, so no destination slot is written
//! twice.
//!
//! The resulting order is block-major: grouped by producing chunk, and the
//! chunk order depends on which group reserved first. Consumers must treat
//! the list as an unordered set.

use core::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use synfire_neural::{Result, SpikeList, SynfireError};

/// Default number of sources per compaction group.
pub const GROUP_WIDTH: usize = 256;

/// Flag-to-index compactor.
#[derive(Debug, Clone)]
pub struct SpikeCompactor {
    group_width: usize,
}

impl Default for SpikeCompactor {
    fn default() -> Self {
        Self {
            group_width: GROUP_WIDTH,
        }
    }
}

impl SpikeCompactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compactor with a non-default group width. Exists for boundary tests;
    /// the width only affects ordering and task granularity, never the set.
    pub fn with_group_width(group_width: usize) -> Result<Self> {
        if group_width == 0 {
            return Err(SynfireError::InvalidConfiguration(
                "compaction group width must be positive".into(),
            ));
        }
        Ok(Self { group_width })
    }

    /// Compact `flags` into `out`. `out` is cleared first; its capacity must
    /// cover one index per source.
    pub fn compact(&self, flags: &[bool], out: &mut SpikeList) -> Result<()> {
        if flags.len() > out.capacity() {
            return Err(SynfireError::CapacityExceeded {
                requested: flags.len(),
                available: out.capacity(),
            });
        }
        out.clear();

        let cursor = AtomicUsize::new(0);
        {
            let slots = out.atomic_slots();
            flags
                .par_chunks(self.group_width)
                .enumerate()
                .for_each(|(group, chunk)| {
                    let base = group * self.group_width;

                    // Phase 1: group-local collection of flagged indices.
                    let mut local: Vec<u32> = Vec::with_capacity(chunk.len());
                    for (i, &fired) in chunk.iter().enumerate() {
                        if fired {
                            local.push((base + i) as u32);
                        }
                    }
                    if local.is_empty() {
                        return;
                    }

                    // Phase 2: one representative reserves the group's region.
                    let offset = cursor.fetch_add(local.len(), Ordering::Relaxed);

                    // Phase 3: copy into the reserved, non-overlapping region.
                    for (slot, &index) in slots[offset..offset + local.len()].iter().zip(&local) {
                        slot.store(index, Ordering::Relaxed);
                    }
                });
        }

        out.set_len(cursor.into_inner())
    }
}
