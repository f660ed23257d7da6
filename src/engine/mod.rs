//! The remix pipeline stages
//!
//! Data flows one way through three pure stages:
//! - Slicer: partition the source into contiguous segments
//! - Sequencer: pick a new (possibly repeating) order of segment indices
//! - Blender: render the reordered segments with crossfaded joins

pub mod blender;
pub mod sequencer;
pub mod slicer;
