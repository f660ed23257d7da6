//! Error types for the remix engine

use std::fmt;

/// Errors that can occur while slicing, sequencing, or blending audio
#[derive(Debug, Clone, PartialEq)]
pub enum RemixError {
    /// The input buffer contains no frames
    EmptyBuffer,

    /// A slicing policy with a non-positive segment count or duration
    InvalidPolicy(String),

    /// Malformed explicit slice boundaries (unsorted, duplicated, or out of range)
    InvalidSlicePlan(String),

    /// Malformed resampling weights (negative, non-finite, all zero, or wrong count)
    InvalidWeights(String),

    /// Channels of a buffer disagree in length
    ChannelMismatch {
        /// Frame count of the first channel
        expected: usize,
        /// Frame count of the offending channel
        actual: usize,
    },

    /// Audio decoding error
    Decode(String),

    /// Audio encoding error
    Encode(String),
}

impl fmt::Display for RemixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemixError::EmptyBuffer => write!(f, "Input buffer contains no frames"),
            RemixError::InvalidPolicy(msg) => write!(f, "Invalid policy: {}", msg),
            RemixError::InvalidSlicePlan(msg) => write!(f, "Invalid slice plan: {}", msg),
            RemixError::InvalidWeights(msg) => write!(f, "Invalid weights: {}", msg),
            RemixError::ChannelMismatch { expected, actual } => write!(
                f,
                "Channel mismatch: expected {} frames per channel, got {}",
                expected, actual
            ),
            RemixError::Decode(msg) => write!(f, "Decoding error: {}", msg),
            RemixError::Encode(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for RemixError {}
