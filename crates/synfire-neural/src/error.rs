// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for synfire operations.
//!
//! The engine is fail-fast: a failed accumulation step has no meaningful
//! partial-success state, so every error propagates to the top-level driver,
//! which prints it and exits non-zero. No retry semantics exist anywhere.

use thiserror::Error;

/// Errors produced by the synfire engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynfireError {
    /// Strategy index outside the supported range.
    #[error("invalid strategy index {index}: expected 0..={max}")]
    InvalidStrategy { index: usize, max: usize },

    /// A buffer would exceed its fixed capacity.
    #[error("capacity exceeded: requested {requested}, available {available}")]
    CapacityExceeded { requested: usize, available: usize },

    /// Buffer dimensions do not agree with each other.
    #[error("dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for synfire operations.
pub type Result<T> = core::result::Result<T, SynfireError>;
