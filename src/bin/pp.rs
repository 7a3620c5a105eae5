//! Thin command-line front end over `pp_codec`.
//!
//! Owns everything the library deliberately stays out of: argument
//! parsing, file I/O, and process logging. Not part of the codec's
//! correctness surface.

use std::fs;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pp_codec::filetype::detect_file_type;
use pp_codec::{compress_full, decompress};

#[derive(Parser)]
#[command(name = "pp", about = "Pied Piper — a single-pass LZ77 byte-stream codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file.
    Compress {
        input_path: String,
        output_path: String,
        /// Advisory compression level, 1-9 (informational only).
        #[arg(long, default_value_t = 6)]
        level: u8,
    },
    /// Decompress a file.
    Decompress { input_path: String, output_path: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compress { input_path, output_path, level } => run_compress(&input_path, &output_path, level),
        Command::Decompress { input_path, output_path } => run_decompress(&input_path, &output_path),
    }
}

fn run_compress(input_path: &str, output_path: &str, level: u8) -> Result<()> {
    if !(1..=9).contains(&level) {
        log::warn!("level {} out of range, will be clamped to 1..9", level);
    }

    let input = fs::read(input_path).with_context(|| format!("reading {}", input_path))?;
    if input.is_empty() {
        bail!("cannot compress an empty file");
    }

    // Advisory only, logged for the operator; never written into the
    // artifact's `file_type` byte, which the format reserves at 0 until a
    // future extension gives it meaning.
    log::debug!("detected content type: {:?}", detect_file_type(&input));

    let started = Instant::now();
    let mut last_logged = -1i32;
    let mut progress = |percent: u8| {
        if percent as i32 >= last_logged + 10 || percent == 100 {
            last_logged = percent as i32;
            log::debug!("compress progress: {}%", percent);
        }
    };
    let (compressed, stats) = compress_full(&input, level, 0, Some(&mut progress))?;

    fs::write(output_path, &compressed).with_context(|| format!("writing {}", output_path))?;

    log::info!(
        "compressed {} -> {} bytes ({:.1}% of original) in {:?}, {} matches",
        stats.input_len,
        stats.output_len,
        stats.ratio * 100.0,
        started.elapsed(),
        stats.matches_found,
    );

    Ok(())
}

fn run_decompress(input_path: &str, output_path: &str) -> Result<()> {
    let input = fs::read(input_path).with_context(|| format!("reading {}", input_path))?;
    let started = Instant::now();
    let output = decompress(&input)?;
    fs::write(output_path, &output).with_context(|| format!("writing {}", output_path))?;

    log::info!("decompressed {} -> {} bytes in {:?}", input.len(), output.len(), started.elapsed());
    Ok(())
}
