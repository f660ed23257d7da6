//! # Slurmcore
//!
//! A slice-and-resequence audio remixing engine. Slurmcore cuts a decoded
//! recording into segments, reorders them under a seeded randomization
//! policy, and renders the result with a crossfade at every join so the
//! output has no audible discontinuity at segment boundaries.
//!
//! ## Features
//!
//! - **Slicing**: fixed segment count, fixed segment duration, or explicit
//!   boundary lists
//! - **Sequencing**: seeded shuffle, weighted resampling with replacement,
//!   or identity order — same seed, same remix
//! - **Blending**: linear or equal-power crossfades at every join, with
//!   optional loop-seam fade and clip reporting
//!
//! ## Quick Start
//!
//! ```no_run
//! use slurmcore::{remix, RemixConfig, SampleBuffer};
//!
//! // Decoded audio (planar, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let buffer = SampleBuffer::from_mono(samples, 44100)?;
//!
//! let output = remix(&buffer, &RemixConfig::default())?;
//!
//! println!(
//!     "Rendered {:.2}s from {} segments",
//!     output.buffer.duration_seconds(),
//!     output.report.segment_count
//! );
//! # Ok::<(), slurmcore::RemixError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline flows strictly one way:
//!
//! ```text
//! SampleBuffer → Slicer → SlicePlan → Sequencer → SequencePlan → Blender → SampleBuffer
//! ```
//!
//! Every stage is a pure function of its inputs; independent buffers can be
//! remixed concurrently from multiple threads with no shared state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod io;

use std::time::Instant;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use config::{OutputLengthPolicy, RemixConfig};
pub use engine::blender::{BlendOptions, BlendStats, CrossfadeSpec, FadeCurve};
pub use engine::sequencer::{SequencePlan, SequencingPolicy};
pub use engine::slicer::{Segment, SlicePlan, SlicingPolicy};
pub use error::RemixError;
pub use io::sample_buffer::SampleBuffer;

/// What a remix run did, alongside the rendered audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemixReport {
    /// Output duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Number of segments the source was cut into
    pub segment_count: usize,

    /// Number of entries in the playback order
    pub sequence_length: usize,

    /// Samples clamped to [-1.0, 1.0] after fade summation (non-fatal)
    pub clipped_samples: usize,

    /// Engine version
    pub engine_version: String,
}

/// Result of a remix run: the rendered buffer plus a report
#[derive(Debug, Clone)]
pub struct RemixOutput {
    /// The rendered audio
    pub buffer: SampleBuffer,
    /// Run metadata and the non-fatal clip report
    pub report: RemixReport,
}

/// Remix a buffer: slice, sequence, and blend under one configuration
///
/// Pure orchestration over the three pipeline stages. The first failure from
/// any stage is returned unmodified; there are no retries and no partial
/// results. Clamped samples during blending are reported through
/// [`RemixReport::clipped_samples`], never raised as an error.
///
/// # Arguments
///
/// * `buffer` - Decoded audio, planar f32 normalized to [-1.0, 1.0]
/// * `config` - Slicing, sequencing, fade, and output-length configuration
///
/// # Returns
///
/// `RemixOutput` with the rendered buffer and a run report
///
/// # Errors
///
/// Returns `RemixError` if the buffer is empty or a policy is invalid; see
/// [`error`] for the full taxonomy.
///
/// # Example
///
/// ```no_run
/// use slurmcore::{remix, RemixConfig};
/// # use slurmcore::SampleBuffer;
///
/// let buffer = SampleBuffer::from_mono(vec![0.0f32; 44100], 44100)?;
/// let output = remix(&buffer, &RemixConfig::default())?;
/// # Ok::<(), slurmcore::RemixError>(())
/// ```
pub fn remix(buffer: &SampleBuffer, config: &RemixConfig) -> Result<RemixOutput, RemixError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting remix: {} frames x {} channels at {} Hz",
        buffer.frames(),
        buffer.num_channels(),
        buffer.sample_rate()
    );

    buffer.validate()?;
    if buffer.frames() == 0 {
        return Err(RemixError::EmptyBuffer);
    }

    let plan = engine::slicer::slice(buffer, &config.slicing)?;
    let sequence = engine::sequencer::sequence(&plan, &config.sequencing, config.seed)?;

    let options = BlendOptions {
        fade: config.fade.clone(),
        gain: config.gain,
        reverse_segments: config.reverse_segments,
    };
    let (mut rendered, stats) = engine::blender::blend(buffer, &plan, &sequence, &options)?;

    if config.output_length == OutputLengthPolicy::MatchOriginal {
        rendered = fit_to_length(rendered, buffer.frames())?;
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!(
        "Remix finished: {} frames in {:.2} ms",
        rendered.frames(),
        processing_time_ms
    );

    let report = RemixReport {
        duration_seconds: rendered.duration_seconds(),
        sample_rate: rendered.sample_rate(),
        processing_time_ms,
        segment_count: plan.len(),
        sequence_length: sequence.len(),
        clipped_samples: stats.clipped_samples,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Ok(RemixOutput {
        buffer: rendered,
        report,
    })
}

/// Truncate or zero-pad a rendered buffer to the requested frame count
fn fit_to_length(buffer: SampleBuffer, frames: usize) -> Result<SampleBuffer, RemixError> {
    if buffer.frames() == frames {
        return Ok(buffer);
    }
    let sample_rate = buffer.sample_rate();
    let channels = buffer
        .into_channels()
        .into_iter()
        .map(|mut ch| {
            ch.resize(frames, 0.0);
            ch
        })
        .collect();
    SampleBuffer::new(channels, sample_rate)
}
