// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Exponential(mean = 1) sampling from uniform draws only.
//!
//! Von Neumann's rejection method: draw `u0`, then keep drawing candidates
//! while they descend. An odd-length descending run accepts `whole + u0`;
//! an even-length run rejects, increments the integer part and restarts.
//! About five uniform draws per sample on average; no hard upper bound on
//! the worst case, but termination has probability 1.

use rand::Rng;

/// One sample from an exponential distribution with mean 1.
///
/// Consumes a variable number of uniform draws from `rng`; that consumption
/// is the only side effect.
pub fn sample_unit_exponential<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let mut whole = 0.0f32;
    loop {
        let first: f32 = rng.gen();
        let mut prev = first;
        // Length of the descending run u0 >= u1 >= ... decides acceptance.
        let mut descents = 0u32;
        loop {
            let next: f32 = rng.gen();
            if next > prev {
                break;
            }
            prev = next;
            descents += 1;
        }
        if descents % 2 == 0 {
            return whole + first;
        }
        whole += 1.0;
    }
}
