//! In-memory decoded audio representation
//!
//! `SampleBuffer` is the type every engine stage consumes and produces:
//! planar f32 channels, normalized to [-1.0, 1.0], plus a sample rate.
//! The engine never mutates a caller's buffer; each run returns a new one.

use crate::error::RemixError;

/// Decoded audio: one `Vec<f32>` per channel, all the same length
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Planar channel data, normalized to [-1.0, 1.0]
    channels: Vec<Vec<f32>>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from planar channel data
    ///
    /// # Errors
    ///
    /// Returns `ChannelMismatch` if the channels differ in length, or
    /// `InvalidPolicy` if no channels are given or the sample rate is zero.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, RemixError> {
        if channels.is_empty() {
            return Err(RemixError::InvalidPolicy(
                "Buffer needs at least one channel".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(RemixError::InvalidPolicy(
                "Sample rate must be positive".to_string(),
            ));
        }
        let expected = channels[0].len();
        for ch in &channels[1..] {
            if ch.len() != expected {
                return Err(RemixError::ChannelMismatch {
                    expected,
                    actual: ch.len(),
                });
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a single-channel buffer
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, RemixError> {
        Self::new(vec![samples], sample_rate)
    }

    /// Create an empty buffer with the given channel count and rate
    ///
    /// Used when a sequence references no segments: the result is a valid
    /// zero-frame buffer, not an error.
    pub fn empty(num_channels: usize, sample_rate: u32) -> Result<Self, RemixError> {
        Self::new(vec![Vec::new(); num_channels.max(1)], sample_rate)
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Samples of one channel
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// All channels, planar
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Consume the buffer, returning the planar channel data
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Re-check the buffer invariants
    ///
    /// Constructors enforce these already; callers that build buffers
    /// elsewhere (decoders, tests) can re-validate before handing one to the
    /// engine.
    pub fn validate(&self) -> Result<(), RemixError> {
        let expected = self.channels[0].len();
        for ch in &self.channels[1..] {
            if ch.len() != expected {
                return Err(RemixError::ChannelMismatch {
                    expected,
                    actual: ch.len(),
                });
            }
        }
        Ok(())
    }
}
