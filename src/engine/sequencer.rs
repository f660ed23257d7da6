//! Reordering segments under a seeded randomization policy
//!
//! Every draw comes from a generator seeded fresh per call, so the same seed
//! and inputs always produce the same plan and concurrent calls never share
//! state. The thread-local generator is never used.

use serde::{Deserialize, Serialize};

use crate::engine::slicer::SlicePlan;
use crate::error::RemixError;

/// The chosen playback order: indices into a `SlicePlan`
///
/// A segment index may appear zero or more times; an empty order is valid
/// and renders to a zero-length buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePlan {
    order: Vec<usize>,
}

impl SequencePlan {
    /// Build a plan from raw indices, checking each against the slice plan
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlicePlan` if any index is out of range.
    pub fn from_order(order: Vec<usize>, plan: &SlicePlan) -> Result<Self, RemixError> {
        if let Some(&bad) = order.iter().find(|&&i| i >= plan.len()) {
            return Err(RemixError::InvalidSlicePlan(format!(
                "Sequence entry {} exceeds segment count {}",
                bad,
                plan.len()
            )));
        }
        Ok(Self { order })
    }

    /// The segment indices, in playback order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the plan references no segments
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// How to reorder the segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequencingPolicy {
    /// A uniformly random permutation of all segment indices
    Shuffle,
    /// `output_length` indices drawn independently with replacement, uniform
    /// unless per-segment weights are given
    WeightedResample {
        /// Number of entries in the resulting plan
        output_length: usize,
        /// Optional non-negative weight per segment
        weights: Option<Vec<f32>>,
    },
    /// The original order, unchanged
    Identity,
}

/// Produce a playback order for the given slice plan
///
/// # Arguments
///
/// * `plan` - Segments to reorder
/// * `policy` - Sequencing policy
/// * `seed` - Seed for the per-call generator; same seed and inputs give the
///   same plan
///
/// # Errors
///
/// Returns `InvalidWeights` if resampling weights are negative, non-finite,
/// all zero, or do not match the segment count.
pub fn sequence(
    plan: &SlicePlan,
    policy: &SequencingPolicy,
    seed: u64,
) -> Result<SequencePlan, RemixError> {
    let order = match policy {
        SequencingPolicy::Identity => (0..plan.len()).collect(),
        SequencingPolicy::Shuffle => {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut order: Vec<usize> = (0..plan.len()).collect();
            rng.shuffle(&mut order);
            order
        }
        SequencingPolicy::WeightedResample {
            output_length,
            weights,
        } => resample(plan.len(), *output_length, weights.as_deref(), seed)?,
    };

    log::debug!(
        "Sequenced {} segments into {} entries (seed {})",
        plan.len(),
        order.len(),
        seed
    );

    Ok(SequencePlan { order })
}

fn resample(
    num_segments: usize,
    output_length: usize,
    weights: Option<&[f32]>,
    seed: u64,
) -> Result<Vec<usize>, RemixError> {
    // Validate before drawing anything.
    let cumulative = match weights {
        Some(weights) => Some(validate_weights(weights, num_segments)?),
        None => None,
    };

    if output_length == 0 {
        return Ok(Vec::new());
    }
    if num_segments == 0 {
        // Nothing to draw from; only reachable with an empty slice plan,
        // which the slicer never produces for a non-empty buffer.
        return Err(RemixError::InvalidWeights(
            "Cannot resample from zero segments".to_string(),
        ));
    }

    let mut rng = fastrand::Rng::with_seed(seed);
    let order = (0..output_length)
        .map(|_| match &cumulative {
            None => rng.usize(0..num_segments),
            Some(cumulative) => {
                let total = *cumulative.last().unwrap_or(&0.0);
                let r = rng.f64() * total;
                // First bucket whose cumulative weight exceeds the draw.
                cumulative
                    .partition_point(|&c| c <= r)
                    .min(num_segments - 1)
            }
        })
        .collect();
    Ok(order)
}

/// Check resampling weights and return their cumulative sums
fn validate_weights(weights: &[f32], num_segments: usize) -> Result<Vec<f64>, RemixError> {
    if weights.len() != num_segments {
        return Err(RemixError::InvalidWeights(format!(
            "Expected {} weights, got {}",
            num_segments,
            weights.len()
        )));
    }
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut sum = 0.0f64;
    for &w in weights {
        if !w.is_finite() || w < 0.0 {
            return Err(RemixError::InvalidWeights(format!(
                "Weights must be finite and non-negative, got {}",
                w
            )));
        }
        sum += w as f64;
        cumulative.push(sum);
    }
    if sum <= 0.0 {
        return Err(RemixError::InvalidWeights(
            "At least one weight must be positive".to_string(),
        ));
    }
    Ok(cumulative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::slicer::{slice, SlicingPolicy};
    use crate::io::sample_buffer::SampleBuffer;

    fn plan(num_segments: usize) -> SlicePlan {
        let buffer = SampleBuffer::from_mono(vec![0.0; num_segments * 4], 44100).unwrap();
        slice(&buffer, &SlicingPolicy::FixedCount(num_segments)).unwrap()
    }

    #[test]
    fn test_identity_preserves_order() {
        let seq = sequence(&plan(5), &SequencingPolicy::Identity, 7).unwrap();
        assert_eq!(seq.order(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let seq = sequence(&plan(16), &SequencingPolicy::Shuffle, 42).unwrap();
        let mut sorted = seq.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_deterministic_per_seed() {
        let p = plan(32);
        let a = sequence(&p, &SequencingPolicy::Shuffle, 1234).unwrap();
        let b = sequence(&p, &SequencingPolicy::Shuffle, 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_varies_across_seeds() {
        let p = plan(32);
        let a = sequence(&p, &SequencingPolicy::Shuffle, 1).unwrap();
        let b = sequence(&p, &SequencingPolicy::Shuffle, 2).unwrap();
        // 32! orderings; two seeds colliding would be astonishing.
        assert_ne!(a, b);
    }

    #[test]
    fn test_resample_length_and_range() {
        let policy = SequencingPolicy::WeightedResample {
            output_length: 100,
            weights: None,
        };
        let seq = sequence(&plan(4), &policy, 9).unwrap();
        assert_eq!(seq.len(), 100);
        assert!(seq.order().iter().all(|&i| i < 4));
    }

    #[test]
    fn test_resample_deterministic_per_seed() {
        let p = plan(8);
        let policy = SequencingPolicy::WeightedResample {
            output_length: 50,
            weights: Some(vec![1.0, 2.0, 0.5, 1.0, 0.0, 3.0, 1.0, 1.0]),
        };
        let a = sequence(&p, &policy, 77).unwrap();
        let b = sequence(&p, &policy, 77).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resample_zero_length_is_empty() {
        let policy = SequencingPolicy::WeightedResample {
            output_length: 0,
            weights: None,
        };
        let seq = sequence(&plan(4), &policy, 0).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_resample_zero_weight_never_drawn() {
        let policy = SequencingPolicy::WeightedResample {
            output_length: 200,
            weights: Some(vec![1.0, 0.0, 1.0]),
        };
        let seq = sequence(&plan(3), &policy, 5).unwrap();
        assert!(seq.order().iter().all(|&i| i != 1));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let policy = SequencingPolicy::WeightedResample {
            output_length: 10,
            weights: Some(vec![1.0, -0.5, 1.0]),
        };
        let result = sequence(&plan(3), &policy, 5);
        assert!(matches!(result, Err(RemixError::InvalidWeights(_))));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let policy = SequencingPolicy::WeightedResample {
            output_length: 10,
            weights: Some(vec![0.0, 0.0]),
        };
        let result = sequence(&plan(2), &policy, 5);
        assert!(matches!(result, Err(RemixError::InvalidWeights(_))));
    }

    #[test]
    fn test_wrong_weight_count_rejected() {
        let policy = SequencingPolicy::WeightedResample {
            output_length: 10,
            weights: Some(vec![1.0, 1.0]),
        };
        let result = sequence(&plan(3), &policy, 5);
        assert!(matches!(result, Err(RemixError::InvalidWeights(_))));
    }

    #[test]
    fn test_from_order_rejects_out_of_range() {
        let result = SequencePlan::from_order(vec![0, 3], &plan(3));
        assert!(matches!(result, Err(RemixError::InvalidSlicePlan(_))));
    }
}
