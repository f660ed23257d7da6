//! Rendering a sequence of segments with crossfaded joins
//!
//! Straight splicing of reordered audio pops: the waveform jumps at every
//! join. The blender removes the jump by overlapping the tail of each
//! rendered segment with the head of the next and sweeping a complementary
//! gain pair across the overlap. The overlap region is shared, so the output
//! is shorter than the naive concatenation by one overlap per join.

use serde::{Deserialize, Serialize};

use crate::engine::sequencer::SequencePlan;
use crate::engine::slicer::SlicePlan;
use crate::error::RemixError;
use crate::io::sample_buffer::SampleBuffer;

/// Crossfade curve shape
///
/// Each variant maps a normalized position in [0, 1] to a
/// `(fade_out, fade_in)` gain pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FadeCurve {
    /// Complementary linear ramp; the pair sums to unity gain
    Linear,
    /// Cosine/sine quarter-cycle; the pair sums to unity power
    #[default]
    EqualPower,
}

impl FadeCurve {
    /// Gain pair at normalized position `t` in [0, 1]
    pub fn gains(&self, t: f32) -> (f32, f32) {
        match self {
            FadeCurve::Linear => (1.0 - t, t),
            FadeCurve::EqualPower => {
                let angle = t * std::f32::consts::FRAC_PI_2;
                (angle.cos(), angle.sin())
            }
        }
    }
}

/// Crossfade applied at every join between consecutive sequence entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossfadeSpec {
    /// Overlap length in frames; 0 degenerates to plain concatenation
    pub duration_frames: usize,
    /// Curve shape swept across the overlap
    pub curve: FadeCurve,
    /// Also crossfade the output's tail into its head so the result loops
    /// cleanly (default: first head and last tail are left unfaded)
    pub loop_fade: bool,
}

impl Default for CrossfadeSpec {
    fn default() -> Self {
        Self {
            duration_frames: 256,
            curve: FadeCurve::EqualPower,
            loop_fade: false,
        }
    }
}

/// Per-segment rendering options for the blender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendOptions {
    /// Crossfade applied at every join
    pub fade: CrossfadeSpec,
    /// Linear gain applied to every rendered segment (default: 1.0)
    pub gain: f32,
    /// Reverse each rendered segment before blending (default: false)
    pub reverse_segments: bool,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            fade: CrossfadeSpec::default(),
            gain: 1.0,
            reverse_segments: false,
        }
    }
}

/// Non-fatal observations from a blend pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendStats {
    /// Samples that exceeded [-1.0, 1.0] after fade summation and were
    /// clamped, totaled across channels
    pub clipped_samples: usize,
}

/// Render the sequenced segments into a new buffer
///
/// Walks the sequence in order, materializes each referenced segment's
/// samples, and joins consecutive segments with an overlap of
/// `min(fade.duration_frames, previous length, next length)` frames. Within
/// the overlap the fade position is `(i + 1) / (overlap + 1)`, keeping both
/// gains strictly inside (0, 1) so no frame of the overlap is wasted at zero
/// gain.
///
/// # Arguments
///
/// * `source` - Buffer the slice plan was derived from
/// * `plan` - Segments, as produced by the slicer
/// * `sequence` - Playback order over `plan`
/// * `options` - Crossfade spec and per-segment transforms
///
/// # Returns
///
/// The rendered buffer plus `BlendStats` reporting how many samples were
/// clamped. An empty sequence yields a zero-length buffer with the source's
/// channel count and rate.
///
/// # Errors
///
/// * `ChannelMismatch` if the source buffer's channels disagree in length
/// * `InvalidSlicePlan` if the plan was derived from a different frame count
///   or a sequence entry is out of range
/// * `InvalidPolicy` if the gain is not finite
pub fn blend(
    source: &SampleBuffer,
    plan: &SlicePlan,
    sequence: &SequencePlan,
    options: &BlendOptions,
) -> Result<(SampleBuffer, BlendStats), RemixError> {
    source.validate()?;
    if plan.source_frames() != source.frames() {
        return Err(RemixError::InvalidSlicePlan(format!(
            "Slice plan covers {} frames but the source has {}",
            plan.source_frames(),
            source.frames()
        )));
    }
    if let Some(&bad) = sequence.order().iter().find(|&&i| i >= plan.len()) {
        return Err(RemixError::InvalidSlicePlan(format!(
            "Sequence entry {} exceeds segment count {}",
            bad,
            plan.len()
        )));
    }
    if !options.gain.is_finite() {
        return Err(RemixError::InvalidPolicy(format!(
            "Gain must be finite, got {}",
            options.gain
        )));
    }

    if sequence.is_empty() {
        let empty = SampleBuffer::empty(source.num_channels(), source.sample_rate())?;
        return Ok((empty, BlendStats::default()));
    }

    let entries: Vec<_> = sequence
        .order()
        .iter()
        .map(|&i| plan.segments()[i])
        .collect();
    let fade = &options.fade;

    let mut clipped_samples = 0usize;
    let mut channels_out = Vec::with_capacity(source.num_channels());
    for ch in source.channels() {
        let mut out: Vec<f32> = Vec::new();
        for (k, seg) in entries.iter().enumerate() {
            let mut rendered = ch[seg.start..seg.end].to_vec();
            if options.reverse_segments {
                rendered.reverse();
            }
            if options.gain != 1.0 {
                for s in &mut rendered {
                    *s *= options.gain;
                }
            }

            if k == 0 {
                out.extend_from_slice(&rendered);
                continue;
            }

            // Never fade across more frames than either adjacent segment
            // contains.
            let overlap = fade
                .duration_frames
                .min(entries[k - 1].len())
                .min(rendered.len());
            let tail_start = out.len() - overlap;
            for i in 0..overlap {
                let t = (i as f32 + 1.0) / (overlap as f32 + 1.0);
                let (fade_out, fade_in) = fade.curve.gains(t);
                out[tail_start + i] = out[tail_start + i] * fade_out + rendered[i] * fade_in;
            }
            out.extend_from_slice(&rendered[overlap..]);
        }

        if fade.loop_fade && !out.is_empty() {
            let overlap = fade.duration_frames.min(out.len() / 2);
            let tail_start = out.len() - overlap;
            for i in 0..overlap {
                let t = (i as f32 + 1.0) / (overlap as f32 + 1.0);
                let (fade_out, fade_in) = fade.curve.gains(t);
                out[i] = out[tail_start + i] * fade_out + out[i] * fade_in;
            }
            out.truncate(tail_start);
        }

        for s in &mut out {
            if *s > 1.0 {
                *s = 1.0;
                clipped_samples += 1;
            } else if *s < -1.0 {
                *s = -1.0;
                clipped_samples += 1;
            }
        }
        channels_out.push(out);
    }

    if clipped_samples > 0 {
        log::warn!("Clamped {} samples after fade summation", clipped_samples);
    }
    log::debug!(
        "Blended {} entries into {} frames ({} joins, fade {} frames)",
        entries.len(),
        channels_out[0].len(),
        entries.len() - 1,
        fade.duration_frames
    );

    let buffer = SampleBuffer::new(channels_out, source.sample_rate())?;
    Ok((buffer, BlendStats { clipped_samples }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sequencer::{sequence, SequencingPolicy};
    use crate::engine::slicer::{slice, SlicingPolicy};

    fn ramp_buffer(frames: usize) -> SampleBuffer {
        // 0.0, 0.01, 0.02, ... stays well inside [-1, 1]
        let samples = (0..frames).map(|i| i as f32 * 0.01).collect();
        SampleBuffer::from_mono(samples, 44100).unwrap()
    }

    fn no_fade() -> BlendOptions {
        BlendOptions {
            fade: CrossfadeSpec {
                duration_frames: 0,
                curve: FadeCurve::Linear,
                loop_fade: false,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_zero_fade_reconstructs_source() {
        let source = ramp_buffer(10);
        let plan = slice(&source, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let (out, stats) = blend(&source, &plan, &seq, &no_fade()).unwrap();
        assert_eq!(out, source);
        assert_eq!(stats.clipped_samples, 0);
    }

    #[test]
    fn test_swap_zero_fade_swaps_halves() {
        let source = ramp_buffer(10);
        let plan = slice(&source, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = SequencePlan::from_order(vec![1, 0], &plan).unwrap();
        let (out, _) = blend(&source, &plan, &seq, &no_fade()).unwrap();
        let expected: Vec<f32> = [5, 6, 7, 8, 9, 0, 1, 2, 3, 4]
            .iter()
            .map(|&i| i as f32 * 0.01)
            .collect();
        assert_eq!(out.channel(0), expected.as_slice());
    }

    #[test]
    fn test_empty_sequence_yields_empty_buffer() {
        let source = ramp_buffer(10);
        let plan = slice(&source, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = SequencePlan::from_order(vec![], &plan).unwrap();
        let (out, stats) = blend(&source, &plan, &seq, &BlendOptions::default()).unwrap();
        assert_eq!(out.frames(), 0);
        assert_eq!(out.num_channels(), 1);
        assert_eq!(stats.clipped_samples, 0);
    }

    #[test]
    fn test_fade_shortens_output_by_overlap_per_join() {
        let source = ramp_buffer(100);
        let plan = slice(&source, &SlicingPolicy::FixedCount(4)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            fade: CrossfadeSpec {
                duration_frames: 10,
                curve: FadeCurve::Linear,
                loop_fade: false,
            },
            ..Default::default()
        };
        let (out, _) = blend(&source, &plan, &seq, &options).unwrap();
        // 4 segments of 25 frames, 3 joins of 10 overlapping frames each.
        assert_eq!(out.frames(), 100 - 3 * 10);
    }

    #[test]
    fn test_fade_clamps_to_shortest_adjacent_segment() {
        let source = ramp_buffer(12);
        // Segments of 3 frames; requested fade is longer than any of them.
        let plan = slice(&source, &SlicingPolicy::FixedDuration(3)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            fade: CrossfadeSpec {
                duration_frames: 100,
                curve: FadeCurve::Linear,
                loop_fade: false,
            },
            ..Default::default()
        };
        let (out, _) = blend(&source, &plan, &seq, &options).unwrap();
        // Every join collapses to a 3-frame overlap.
        assert_eq!(out.frames(), 12 - 3 * 3);
    }

    #[test]
    fn test_linear_fade_preserves_constant_signal() {
        // A DC signal crossfaded with itself under a unity-sum curve must
        // stay exactly at the DC level through the joins.
        let source = SampleBuffer::from_mono(vec![0.25; 40], 44100).unwrap();
        let plan = slice(&source, &SlicingPolicy::FixedCount(4)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            fade: CrossfadeSpec {
                duration_frames: 4,
                curve: FadeCurve::Linear,
                loop_fade: false,
            },
            ..Default::default()
        };
        let (out, _) = blend(&source, &plan, &seq, &options).unwrap();
        for &s in out.channel(0) {
            assert!((s - 0.25).abs() < 1e-6, "DC level drifted to {}", s);
        }
    }

    #[test]
    fn test_equal_power_gains_sum_to_unity_power() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let (fade_out, fade_in) = FadeCurve::EqualPower.gains(t);
            let power = fade_out * fade_out + fade_in * fade_in;
            assert!((power - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gain_applied_and_clipping_counted() {
        let source = SampleBuffer::from_mono(vec![0.9; 10], 44100).unwrap();
        let plan = slice(&source, &SlicingPolicy::FixedCount(1)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            gain: 2.0,
            ..no_fade()
        };
        let (out, stats) = blend(&source, &plan, &seq, &options).unwrap();
        assert!(out.channel(0).iter().all(|&s| s == 1.0));
        assert_eq!(stats.clipped_samples, 10);
    }

    #[test]
    fn test_reverse_segments() {
        let source = ramp_buffer(6);
        let plan = slice(&source, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            reverse_segments: true,
            ..no_fade()
        };
        let (out, _) = blend(&source, &plan, &seq, &options).unwrap();
        let expected: Vec<f32> = [2, 1, 0, 5, 4, 3]
            .iter()
            .map(|&i| i as f32 * 0.01)
            .collect();
        assert_eq!(out.channel(0), expected.as_slice());
    }

    #[test]
    fn test_loop_fade_shortens_output() {
        let source = ramp_buffer(100);
        let plan = slice(&source, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            fade: CrossfadeSpec {
                duration_frames: 10,
                curve: FadeCurve::EqualPower,
                loop_fade: true,
            },
            ..Default::default()
        };
        let (out, _) = blend(&source, &plan, &seq, &options).unwrap();
        // One internal join plus the loop overlap.
        assert_eq!(out.frames(), 100 - 10 - 10);
    }

    #[test]
    fn test_multichannel_blend_keeps_channels_aligned() {
        let left: Vec<f32> = (0..20).map(|i| i as f32 * 0.01).collect();
        let right: Vec<f32> = (0..20).map(|i| -(i as f32) * 0.01).collect();
        let source = SampleBuffer::new(vec![left, right], 48000).unwrap();
        let plan = slice(&source, &SlicingPolicy::FixedCount(4)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Shuffle, 3).unwrap();
        let options = BlendOptions {
            fade: CrossfadeSpec {
                duration_frames: 2,
                curve: FadeCurve::Linear,
                loop_fade: false,
            },
            ..Default::default()
        };
        let (out, _) = blend(&source, &plan, &seq, &options).unwrap();
        assert_eq!(out.num_channels(), 2);
        assert_eq!(out.sample_rate(), 48000);
        // Channels are negatives of each other in the source, and both go
        // through the same plan, so that must hold in the output too.
        for i in 0..out.frames() {
            assert!((out.channel(0)[i] + out.channel(1)[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_plan_from_other_buffer_rejected() {
        let source = ramp_buffer(10);
        let other = ramp_buffer(20);
        let plan = slice(&other, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let result = blend(&source, &plan, &seq, &BlendOptions::default());
        assert!(matches!(result, Err(RemixError::InvalidSlicePlan(_))));
    }

    #[test]
    fn test_non_finite_gain_rejected() {
        let source = ramp_buffer(10);
        let plan = slice(&source, &SlicingPolicy::FixedCount(2)).unwrap();
        let seq = sequence(&plan, &SequencingPolicy::Identity, 0).unwrap();
        let options = BlendOptions {
            gain: f32::NAN,
            ..Default::default()
        };
        let result = blend(&source, &plan, &seq, &options);
        assert!(matches!(result, Err(RemixError::InvalidPolicy(_))));
    }
}
