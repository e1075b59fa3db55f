// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Compacted per-timestep spike list.
//!
//! One count plus a fixed-capacity buffer of source indices. Capacity always
//! equals the source population, so a timestep can never overflow it (each
//! source emits at most one event per timestep).
//!
//! Index order is block-major: indices appear grouped by the parallel
//! partition that produced them, NOT sorted by source index. Consumers must
//! not assume sorted order.

use core::sync::atomic::AtomicU32;

use crate::error::{Result, SynfireError};
use crate::ids::SourceId;

/// Dense list of the sources that emitted an event this timestep.
#[derive(Debug)]
pub struct SpikeList {
    /// Backing storage, always `capacity` long; only `[..len]` is live.
    indices: Vec<u32>,
    len: usize,
}

impl SpikeList {
    /// Create a list able to hold one index per source.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: vec![0; capacity],
            len: 0,
        }
    }

    /// Reset the count. The backing storage is reused across timesteps.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.indices.len()
    }

    /// Live indices, block-major order.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.indices().iter().map(|&i| SourceId(i))
    }

    /// Append one index. Used by tests and manual scenario construction; the
    /// compactor fills the list through [`SpikeList::atomic_slots`] instead.
    pub fn push(&mut self, source: SourceId) -> Result<()> {
        if self.len == self.indices.len() {
            return Err(SynfireError::CapacityExceeded {
                requested: self.len + 1,
                available: self.indices.len(),
            });
        }
        self.indices[self.len] = source.0;
        self.len += 1;
        Ok(())
    }

    /// Atomic view over the full backing storage, for concurrent filling.
    ///
    /// The `&mut` receiver guarantees no other reader exists while writer
    /// tasks hold the returned slots. Writers store into disjoint reserved
    /// regions; the final count is published with [`SpikeList::set_len`].
    pub fn atomic_slots(&mut self) -> &[AtomicU32] {
        // AtomicU32 is guaranteed to have the same in-memory representation
        // as u32, and the &mut receiver makes the aliasing exclusive.
        unsafe { &*(self.indices.as_mut_slice() as *mut [u32] as *const [AtomicU32]) }
    }

    /// Publish the number of live indices after a concurrent fill.
    pub fn set_len(&mut self, len: usize) -> Result<()> {
        if len > self.indices.len() {
            return Err(SynfireError::CapacityExceeded {
                requested: len,
                available: self.indices.len(),
            });
        }
        self.len = len;
        Ok(())
    }
}
