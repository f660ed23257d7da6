//! WAV encoding using hound

use std::path::Path;

use crate::error::RemixError;
use crate::io::sample_buffer::SampleBuffer;

/// Write a sample buffer to a 16-bit PCM WAV file
///
/// # Arguments
///
/// * `path` - Destination path
/// * `buffer` - Audio to write; samples outside [-1.0, 1.0] are clamped
///
/// # Errors
///
/// Returns `RemixError::Encode` if the file cannot be created or written.
pub fn encode_wav(path: &Path, buffer: &SampleBuffer) -> Result<(), RemixError> {
    buffer.validate()?;
    log::debug!(
        "Writing {} frames x {} channels to {}",
        buffer.frames(),
        buffer.num_channels(),
        path.display()
    );

    let spec = hound::WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| RemixError::Encode(format!("Failed to create {}: {}", path.display(), e)))?;

    for i in 0..buffer.frames() {
        for ch in buffer.channels() {
            let sample = (ch[i].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(sample)
                .map_err(|e| RemixError::Encode(format!("Write failed: {}", e)))?;
        }
    }

    writer
        .finalize()
        .map_err(|e| RemixError::Encode(format!("Finalize failed: {}", e)))
}
