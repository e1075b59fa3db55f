// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared per-target current buffer.
//!
//! The only resource mutated by more than one concurrent worker group per
//! timestep. Contended strategies go through the lock-free
//! [`atomic_add_f32`] primitive; exclusive-partition strategies write plain
//! `f32` slices. The buffer is never reset between timesteps: it accumulates
//! across the entire run.

use core::sync::atomic::{AtomicU32, Ordering};

/// One f32 accumulator per target.
#[derive(Debug)]
pub struct CurrentBuffer {
    values: Vec<f32>,
}

impl CurrentBuffer {
    /// Zero-initialized buffer with one slot per target.
    pub fn new(num_targets: usize) -> Self {
        Self {
            values: vec![0.0; num_targets],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Exclusive mutable access, for strategies that partition targets
    /// disjointly and need no atomics.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Lock-free view for strategies where multiple worker groups add into
    /// the same target concurrently. Slots hold f32 bit patterns; combine
    /// through [`atomic_add_f32`].
    ///
    /// The `&mut` receiver guarantees the view is the only access path for
    /// its lifetime.
    pub fn atomic_view(&mut self) -> &[AtomicU32] {
        // AtomicU32 has the same in-memory representation as u32/f32 bits,
        // and the &mut receiver makes the aliasing exclusive.
        unsafe { &*(self.values.as_mut_slice() as *mut [f32] as *const [AtomicU32]) }
    }

    /// Mean of all accumulated currents.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().map(|&v| v as f64).sum::<f64>() / self.values.len() as f64
    }
}

/// Lock-free `*slot += value` on an f32 stored as its bit pattern.
///
/// Compare-exchange loop over the bits; Relaxed ordering suffices because
/// only the numeric total matters and the caller joins all workers before
/// reading the buffer back.
#[inline]
pub fn atomic_add_f32(slot: &AtomicU32, value: f32) {
    let mut current = slot.load(Ordering::Relaxed);
    loop {
        let next = (f32::from_bits(current) + value).to_bits();
        match slot.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}
