//! Partitioning a buffer into contiguous segments
//!
//! The slicer turns `[0, frames)` into an ordered list of non-overlapping,
//! collectively exhaustive frame ranges. Segments are index ranges into the
//! source buffer, never copies; sample data is only materialized by the
//! blender.

use serde::{Deserialize, Serialize};

use crate::error::RemixError;
use crate::io::sample_buffer::SampleBuffer;

/// A half-open frame range `[start, end)` into the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// First frame of the segment
    pub start: usize,
    /// One past the last frame of the segment
    pub end: usize,
}

impl Segment {
    /// Segment length in frames
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment contains no frames
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The ordered segments covering a source buffer
///
/// Immutable once produced: segments are in original temporal order,
/// non-overlapping, and partition `[0, source_frames)` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    segments: Vec<Segment>,
    source_frames: usize,
}

impl SlicePlan {
    /// The segments, in original temporal order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the plan holds no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Frame count of the buffer this plan was derived from
    pub fn source_frames(&self) -> usize {
        self.source_frames
    }
}

/// How to cut the source buffer into segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlicingPolicy {
    /// `n` segments of near-equal length; the remainder is distributed one
    /// frame at a time to the earliest segments
    FixedCount(usize),
    /// Segments of `d` frames, with a shorter final segment holding any
    /// remainder
    FixedDuration(usize),
    /// Caller-supplied cut points; must be strictly increasing and within
    /// `[0, frames]`
    ExplicitBoundaries(Vec<usize>),
}

/// Partition a buffer into segments according to a policy
///
/// # Arguments
///
/// * `buffer` - Source audio
/// * `policy` - Slicing policy
///
/// # Returns
///
/// A `SlicePlan` whose segments partition `[0, buffer.frames())` exactly:
/// contiguous, starting at 0, ending at the frame count, no frame dropped.
///
/// # Errors
///
/// * `EmptyBuffer` if the buffer has no frames
/// * `InvalidPolicy` if the count or duration is zero
/// * `InvalidSlicePlan` if explicit boundaries are unsorted, duplicated, or
///   out of range
pub fn slice(buffer: &SampleBuffer, policy: &SlicingPolicy) -> Result<SlicePlan, RemixError> {
    let frames = buffer.frames();
    if frames == 0 {
        return Err(RemixError::EmptyBuffer);
    }

    let segments = match policy {
        SlicingPolicy::FixedCount(n) => fixed_count(frames, *n)?,
        SlicingPolicy::FixedDuration(d) => fixed_duration(frames, *d)?,
        SlicingPolicy::ExplicitBoundaries(boundaries) => explicit(frames, boundaries)?,
    };

    log::debug!(
        "Sliced {} frames into {} segments ({:?})",
        frames,
        segments.len(),
        policy
    );

    Ok(SlicePlan {
        segments,
        source_frames: frames,
    })
}

fn fixed_count(frames: usize, n: usize) -> Result<Vec<Segment>, RemixError> {
    if n == 0 {
        return Err(RemixError::InvalidPolicy(
            "Segment count must be positive".to_string(),
        ));
    }

    let base = frames / n;
    let remainder = frames % n;
    let mut segments = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let len = base + usize::from(i < remainder);
        segments.push(Segment {
            start,
            end: start + len,
        });
        start += len;
    }
    // Zero-length segments only occur when n > frames; they are valid but
    // contribute nothing, so drop them here rather than special-casing the
    // blender.
    segments.retain(|s| !s.is_empty());
    Ok(segments)
}

fn fixed_duration(frames: usize, d: usize) -> Result<Vec<Segment>, RemixError> {
    if d == 0 {
        return Err(RemixError::InvalidPolicy(
            "Segment duration must be positive".to_string(),
        ));
    }

    let mut segments = Vec::with_capacity(frames.div_ceil(d));
    let mut start = 0;
    while start < frames {
        let end = (start + d).min(frames);
        segments.push(Segment { start, end });
        start = end;
    }
    Ok(segments)
}

fn explicit(frames: usize, boundaries: &[usize]) -> Result<Vec<Segment>, RemixError> {
    for pair in boundaries.windows(2) {
        if pair[1] <= pair[0] {
            return Err(RemixError::InvalidSlicePlan(format!(
                "Boundaries must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }
    }
    if let Some(&last) = boundaries.last() {
        if last > frames {
            return Err(RemixError::InvalidSlicePlan(format!(
                "Boundary {} exceeds buffer length {}",
                last, frames
            )));
        }
    }

    // Interior boundaries define the cuts; 0 and `frames` are accepted but
    // redundant.
    let mut cuts: Vec<usize> = Vec::with_capacity(boundaries.len() + 2);
    cuts.push(0);
    cuts.extend(boundaries.iter().copied().filter(|&b| b > 0 && b < frames));
    cuts.push(frames);

    let segments = cuts
        .windows(2)
        .map(|pair| Segment {
            start: pair[0],
            end: pair[1],
        })
        .collect();
    Ok(segments)
}
