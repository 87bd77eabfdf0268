//! Thin command-line glue around `sizecap-core`.
//!
//! Reads one image file, runs the size-constrained optimizer, writes the
//! result next to the input (or wherever `--output` points).

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sizecap_core::{Optimizer, OptimizerConfig, OutputFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sizecap", version, about = "Shrink an image until it fits a byte budget")]
struct Cli {
    /// Image to optimize.
    input: PathBuf,

    /// Where to write the result (defaults to `<input>_optimized.<ext>`).
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Lossy encoding quality (1-100).
    #[arg(long, short = 'q', default_value_t = 80)]
    quality: u8,

    /// Maximum acceptable output size in bytes.
    #[arg(long, short = 't', default_value_t = 99_000)]
    threshold: u64,

    /// Ratio step between rounds.
    #[arg(long, default_value_t = 0.01)]
    increment: f64,

    /// Hard cap on search rounds.
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    /// Explicit target width, overriding ratio-based scaling.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Explicit target height, paired with --width.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Re-encode in the input's format instead of converting to JPEG.
    #[arg(long)]
    keep_format: bool,

    /// Scratch directory root (defaults to the system temporary directory).
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let filename = cli
        .input
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("image")
        .to_string();

    let config = OptimizerConfig {
        quality: cli.quality,
        increment: cli.increment,
        threshold: cli.threshold,
        max_rounds: cli.max_rounds,
        width: cli.width,
        height: cli.height,
        format: pick_format(&cli.input, cli.keep_format),
        scratch_root: cli.scratch_dir.clone(),
        ..OptimizerConfig::default()
    };

    let optimizer = Optimizer::new(config);
    let result = optimizer.optimize(&bytes, &filename)?;

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input, result.extension()));
    fs::write(&output, result.image.as_bytes())
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        input = %cli.input.display(),
        output = %output.display(),
        "done"
    );
    println!(
        "{} bytes -> {} bytes ({}x{}, ratio {:.2}, {} rounds) -> {}",
        result.original_size,
        result.size(),
        result.width,
        result.height,
        result.ratio,
        result.rounds,
        output.display()
    );

    Ok(())
}

/// JPEG unless `--keep-format` maps the input extension to a supported
/// encoding.
fn pick_format(input: &Path, keep_format: bool) -> OutputFormat {
    if !keep_format {
        return OutputFormat::Jpeg;
    }
    input
        .extension()
        .and_then(OsStr::to_str)
        .and_then(OutputFormat::from_extension)
        .unwrap_or_default()
}

/// Sibling of the input, `<stem>_optimized.<ext>`.
fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("image");
    input.with_file_name(format!("{stem}_optimized.{extension}"))
}
