//! Audio I/O modules
//!
//! The engine itself only ever touches `SampleBuffer`s; these modules are
//! the boundary collaborators that get audio in and out of that form.
//! Decoding uses Symphonia, encoding writes WAV via hound.

pub mod decoder;
pub mod encoder;
pub mod sample_buffer;
