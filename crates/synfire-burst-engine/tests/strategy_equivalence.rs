// Copyright 2025 Synfire contributors
// SPDX-License-Identifier: Apache-2.0

//! Cross-strategy equivalence and boundary behavior.
//!
//! All four accumulation strategies share one contract; these tests pin the
//! contract down against a scalar reference implementation and against each
//! other, including the partial-tile and partial-block boundaries.

use rand::Rng;
use synfire_burst_engine::accumulate::{DenseAccumulator, StrategyKind, SPIKE_TILE, TARGET_BLOCK};
use synfire_burst_engine::rng_streams;
use synfire_neural::{CurrentBuffer, SourceId, SpikeList, WeightMatrix};

/// Scalar reference: plain double loop, no partitioning.
fn reference_sums(spikes: &SpikeList, weights: &WeightMatrix) -> Vec<f32> {
    let mut sums = vec![0.0f32; weights.num_targets()];
    for source in spikes.iter() {
        for (sum, &w) in sums.iter_mut().zip(weights.row(source)) {
            *sum += w;
        }
    }
    sums
}

fn random_weights(num_sources: usize, num_targets: usize, seed: u64) -> WeightMatrix {
    let mut rng = rng_streams::stream(seed, 0);
    WeightMatrix::from_fn(num_sources, num_targets, |_, _| rng.gen::<f32>() * 2.0)
}

fn spike_list(num_sources: usize, spike_count: usize, seed: u64) -> SpikeList {
    assert!(spike_count <= num_sources);
    let mut rng = rng_streams::stream(seed, 1);
    let mut picked = vec![false; num_sources];
    let mut list = SpikeList::with_capacity(num_sources);
    let mut remaining = spike_count;
    while remaining > 0 {
        let s = rng.gen_range(0..num_sources);
        if !picked[s] {
            picked[s] = true;
            list.push(SourceId(s as u32)).unwrap();
            remaining -= 1;
        }
    }
    list
}

fn assert_close(actual: &[f32], expected: &[f32], context: &str) {
    assert_eq!(actual.len(), expected.len());
    for (t, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        let scale = e.abs().max(1.0);
        assert!(
            (a - e).abs() / scale < 1e-3,
            "{context}: target {t} differs: {a} vs {e}"
        );
    }
}

fn run_strategy(
    kind: StrategyKind,
    spikes: &SpikeList,
    weights: &WeightMatrix,
    initial: Option<&[f32]>,
) -> Vec<f32> {
    let mut currents = CurrentBuffer::new(weights.num_targets());
    if let Some(initial) = initial {
        currents.values_mut().copy_from_slice(initial);
    }
    kind.build().accumulate(spikes, weights, &mut currents).unwrap();
    currents.values().to_vec()
}

#[test]
fn all_strategies_match_reference() {
    let num_sources = 700;
    let num_targets = 500; // not a multiple of TARGET_BLOCK
    let weights = random_weights(num_sources, num_targets, 42);
    let spikes = spike_list(num_sources, 123, 42);
    let expected = reference_sums(&spikes, &weights);

    for kind in StrategyKind::ALL {
        let got = run_strategy(kind, &spikes, &weights, None);
        assert_close(&got, &expected, kind.name());
    }
}

#[test]
fn strategies_agree_pairwise() {
    let weights = random_weights(300, 300, 7);
    let spikes = spike_list(300, 150, 7);
    let baseline = run_strategy(StrategyKind::PerTarget, &spikes, &weights, None);
    for kind in &StrategyKind::ALL[1..] {
        let got = run_strategy(*kind, &spikes, &weights, None);
        assert_close(&got, &baseline, kind.name());
    }
}

#[test]
fn zero_spikes_is_a_noop() {
    let weights = random_weights(64, 64, 3);
    let spikes = SpikeList::with_capacity(64);
    let initial: Vec<f32> = (0..64).map(|i| i as f32 * 0.25).collect();
    for kind in StrategyKind::ALL {
        let got = run_strategy(kind, &spikes, &weights, Some(&initial));
        assert_eq!(got, initial, "{} modified the buffer", kind.name());
    }
}

#[test]
fn spike_count_at_tile_multiple_and_one_past() {
    let num_sources = SPIKE_TILE * 3 + 8;
    let weights = random_weights(num_sources, 96, 9);

    for spike_count in [SPIKE_TILE, SPIKE_TILE * 2, SPIKE_TILE + 1, SPIKE_TILE * 2 + 1] {
        let spikes = spike_list(num_sources, spike_count, spike_count as u64);
        let expected = reference_sums(&spikes, &weights);
        for kind in StrategyKind::ALL {
            let got = run_strategy(kind, &spikes, &weights, None);
            assert_close(&got, &expected, &format!("{} n={spike_count}", kind.name()));
        }
    }
}

#[test]
fn target_count_off_block_boundary_stays_in_bounds() {
    // One more target than a full block: the tail block has a single target.
    let num_targets = TARGET_BLOCK + 1;
    let weights = random_weights(200, num_targets, 13);
    let spikes = spike_list(200, 77, 13);
    let expected = reference_sums(&spikes, &weights);

    for kind in StrategyKind::ALL {
        let got = run_strategy(kind, &spikes, &weights, None);
        assert_close(&got, &expected, kind.name());
        assert_eq!(got.len(), num_targets);
    }
}

#[test]
fn four_by_four_two_spikes_adds_two_everywhere() {
    let weights = WeightMatrix::uniform(4, 4, 1.0);
    let mut spikes = SpikeList::with_capacity(4);
    spikes.push(SourceId(1)).unwrap();
    spikes.push(SourceId(3)).unwrap();

    for kind in StrategyKind::ALL {
        let mut currents = CurrentBuffer::new(4);
        let strategy = kind.build();
        strategy.accumulate(&spikes, &weights, &mut currents).unwrap();
        assert_eq!(currents.values(), &[2.0; 4], "{}", kind.name());

        // A second timestep accumulates on top: nothing resets the buffer.
        strategy.accumulate(&spikes, &weights, &mut currents).unwrap();
        assert_eq!(currents.values(), &[4.0; 4], "{}", kind.name());
    }
}

#[test]
fn single_spike_single_target() {
    let weights = WeightMatrix::uniform(1, 1, 0.5);
    let mut spikes = SpikeList::with_capacity(1);
    spikes.push(SourceId(0)).unwrap();
    for kind in StrategyKind::ALL {
        let got = run_strategy(kind, &spikes, &weights, None);
        assert_eq!(got, vec![0.5]);
    }
}
