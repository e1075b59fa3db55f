// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed identifiers for sources and targets.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of an event-emitting source (index in `[0, num_sources)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u32);

/// Identifier of a current-accumulating target (index in `[0, num_targets)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl SourceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TargetId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src:{}", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tgt:{}", self.0)
    }
}
