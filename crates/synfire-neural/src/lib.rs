// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! # synfire-neural
//!
//! Core types for the synfire dense spike-propagation engine: identifiers,
//! spike buffers, the dense weight matrix, the shared current buffer and its
//! lock-free accumulation primitive, simulation configuration and the error
//! taxonomy.
//!
//! This crate contains no execution logic. The timestep loop, the random
//! streams and the accumulation strategies live in `synfire-burst-engine`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod currents;
pub mod error;
pub mod ids;
pub mod spike_list;
pub mod weights;

pub use config::SimulationConfig;
pub use currents::{atomic_add_f32, CurrentBuffer};
pub use error::{Result, SynfireError};
pub use ids::{SourceId, TargetId};
pub use spike_list::SpikeList;
pub use weights::WeightMatrix;
