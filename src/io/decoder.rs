//! Audio decoding using Symphonia
//!
//! Decodes any container/codec symphonia's default registry handles into a
//! planar [`SampleBuffer`]. Corrupted packets are skipped rather than
//! aborting the decode.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::RemixError;
use crate::io::sample_buffer::SampleBuffer;

/// Decode an audio file into a planar sample buffer
///
/// # Arguments
///
/// * `path` - Path to the audio file
///
/// # Errors
///
/// Returns `RemixError::Decode` if the file cannot be opened, probed, or
/// decoded, or if it contains no audio.
pub fn decode_file(path: &Path) -> Result<SampleBuffer, RemixError> {
    log::debug!("Decoding {}", path.display());

    let src = File::open(path)
        .map_err(|e| RemixError::Decode(format!("Failed to open {}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| RemixError::Decode(format!("Unrecognized format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| RemixError::Decode("No supported audio tracks found".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| RemixError::Decode("Track is missing a sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| RemixError::Decode(format!("No decoder for track: {}", e)))?;

    let mut channels: Vec<Vec<f32>> = Vec::new();
    let mut interleaved: Option<InterleavedBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream (or an unrecoverable container error, which
            // leaves us with whatever decoded so far).
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let num_channels = spec.channels.count();
                if channels.is_empty() {
                    channels = vec![Vec::new(); num_channels];
                }
                let buf = interleaved
                    .get_or_insert_with(|| InterleavedBuffer::new(decoded.capacity() as u64, spec));
                buf.copy_interleaved_ref(decoded);
                for frame in buf.samples().chunks_exact(num_channels) {
                    for (ch, &sample) in channels.iter_mut().zip(frame) {
                        ch.push(sample);
                    }
                }
            }
            // Corrupted packets happen in real files; skip them.
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping corrupt packet in {}: {}", path.display(), e);
                continue;
            }
            Err(e) => return Err(RemixError::Decode(format!("Decode failed: {}", e))),
        }
    }

    if channels.is_empty() {
        return Err(RemixError::Decode(format!(
            "{} decoded to no audio",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} frames x {} channels at {} Hz",
        channels[0].len(),
        channels.len(),
        sample_rate
    );
    SampleBuffer::new(channels, sample_rate)
}
