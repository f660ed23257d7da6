//! Configuration parameters for a remix run

use serde::{Deserialize, Serialize};

use crate::engine::blender::CrossfadeSpec;
use crate::engine::sequencer::SequencingPolicy;
use crate::engine::slicer::SlicingPolicy;

/// What length the rendered buffer should have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputLengthPolicy {
    /// Whatever the sequenced segments render to (default)
    #[default]
    MatchSequence,
    /// Truncate or zero-pad the result to the source's frame count
    MatchOriginal,
}

/// Immutable configuration for a remix run
///
/// Every run is a pure function of (input buffer, config); there is no
/// global state, and the seed fully determines the randomized stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemixConfig {
    /// How to cut the source into segments (default: 16 equal segments)
    pub slicing: SlicingPolicy,

    /// How to reorder the segments (default: Shuffle)
    pub sequencing: SequencingPolicy,

    /// Seed for the sequencing stage's generator (default: 0)
    pub seed: u64,

    /// Crossfade applied at every join (default: 256 frames, equal power)
    pub fade: CrossfadeSpec,

    /// Output length policy (default: MatchSequence)
    pub output_length: OutputLengthPolicy,

    /// Linear gain applied to every rendered segment (default: 1.0)
    pub gain: f32,

    /// Reverse each rendered segment before blending (default: false)
    pub reverse_segments: bool,
}

impl Default for RemixConfig {
    fn default() -> Self {
        Self {
            slicing: SlicingPolicy::FixedCount(16),
            sequencing: SequencingPolicy::Shuffle,
            seed: 0,
            fade: CrossfadeSpec::default(),
            output_length: OutputLengthPolicy::MatchSequence,
            gain: 1.0,
            reverse_segments: false,
        }
    }
}
