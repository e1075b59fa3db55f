// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense weight matrix: every source connected to every target.
//!
//! Row-major by source, written once at initialization and read-only for the
//! rest of the run, so all accumulation strategies share it without
//! synchronization. Flat storage keeps row access a contiguous slice, which
//! is what the accumulation hot loops iterate.

use crate::error::{Result, SynfireError};
use crate::ids::SourceId;

/// `num_sources x num_targets` single-precision weights.
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    data: Vec<f32>,
    num_sources: usize,
    num_targets: usize,
}

impl WeightMatrix {
    /// Build a matrix by evaluating `f(source, target)` for every cell.
    pub fn from_fn<F>(num_sources: usize, num_targets: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(num_sources * num_targets);
        for s in 0..num_sources {
            for t in 0..num_targets {
                data.push(f(s, t));
            }
        }
        Self {
            data,
            num_sources,
            num_targets,
        }
    }

    /// Constant-weight matrix. Used by deterministic scenario tests.
    pub fn uniform(num_sources: usize, num_targets: usize, value: f32) -> Self {
        Self {
            data: vec![value; num_sources * num_targets],
            num_sources,
            num_targets,
        }
    }

    /// Build a matrix from pre-filled row-major storage.
    pub fn from_flat(num_sources: usize, num_targets: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != num_sources * num_targets {
            return Err(SynfireError::DimensionMismatch {
                expected: num_sources * num_targets,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            num_sources,
            num_targets,
        })
    }

    #[inline]
    pub fn num_sources(&self) -> usize {
        self.num_sources
    }

    #[inline]
    pub fn num_targets(&self) -> usize {
        self.num_targets
    }

    /// The weight row of one source: `row(s)[t]` is the weight from `s` to `t`.
    #[inline]
    pub fn row(&self, source: SourceId) -> &[f32] {
        let base = source.index() * self.num_targets;
        &self.data[base..base + self.num_targets]
    }

    /// Mean of all weights. Diagnostic only.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().map(|&w| w as f64).sum::<f64>() / self.data.len() as f64
    }
}
