//! Example: Remix a single audio file
//!
//! Usage:
//!   cargo run --release --example remix_file -- <input> [--config config.json] [--seed N]
//!
//! Writes the remix next to the input with a "-slurmed" filename suffix.

use std::env;
use std::path::{Path, PathBuf};

use slurmcore::io::{decoder, encoder};
use slurmcore::{remix, RemixConfig};

/// Append a suffix to the file stem, keeping directory and extension
fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let mut name = format!("{}{}", stem, suffix);
    name.push_str(".wav");
    path.with_file_name(name)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut input: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next(),
            "--seed" => seed = args.next().and_then(|s| s.parse().ok()),
            _ => input = Some(arg),
        }
    }
    let input = input.ok_or("Usage: remix_file <input> [--config config.json] [--seed N]")?;
    let input = PathBuf::from(input);

    let mut config: RemixConfig = match config_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => RemixConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let buffer = decoder::decode_file(&input)?;
    println!(
        "Loaded {}: {:.2}s, {} channels at {} Hz",
        input.display(),
        buffer.duration_seconds(),
        buffer.num_channels(),
        buffer.sample_rate()
    );

    let output = remix(&buffer, &config)?;
    println!("Remix Results:");
    println!("  Segments: {}", output.report.segment_count);
    println!("  Sequence length: {}", output.report.sequence_length);
    println!("  Output duration: {:.2}s", output.report.duration_seconds);
    println!("  Clipped samples: {}", output.report.clipped_samples);
    println!(
        "  Processing time: {:.2} ms",
        output.report.processing_time_ms
    );

    let out_path = suffixed_path(&input, "-slurmed");
    encoder::encode_wav(&out_path, &output.buffer)?;
    println!("Saved to {}", out_path.display());

    Ok(())
}
