//! Example: Remix multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example remix_batch -- [--jobs N] [--seed N] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files; each remix is still single-threaded.
//! - Every run gets a fresh seeded generator, so results do not depend on
//!   how the files are scheduled across workers.
//! - Default workers: (available CPU threads - 1), keeping one core free.

use std::env;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use slurmcore::io::{decoder, encoder};
use slurmcore::{remix, RemixConfig};

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}-slurmed.wav", stem))
}

fn process(path: &str, config: &RemixConfig) -> Result<f32, Box<dyn std::error::Error>> {
    let input = PathBuf::from(path);
    let buffer = decoder::decode_file(&input)?;
    let output = remix(&buffer, config)?;
    encoder::encode_wav(&output_path(&input), &output.buffer)?;
    Ok(output.report.processing_time_ms)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut jobs: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut paths: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--jobs" => jobs = args.next().and_then(|s| s.parse().ok()),
            "--seed" => seed = args.next().and_then(|s| s.parse().ok()),
            _ => paths.push(arg),
        }
    }
    if paths.is_empty() {
        return Err("Usage: remix_batch [--jobs N] [--seed N] <file1> <file2> ...".into());
    }

    let mut config = RemixConfig::default();
    if let Some(seed) = seed {
        config.seed = seed;
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or_else(default_jobs))
        .build_global()?;

    let results: Vec<(String, Result<f32, String>)> = paths
        .par_iter()
        .map(|path| {
            let result = process(path, &config).map_err(|e| e.to_string());
            (path.clone(), result)
        })
        .collect();

    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(ms) => println!("{}: done in {:.2} ms", path, ms),
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", path, e);
            }
        }
    }
    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, results.len()).into());
    }
    Ok(())
}
