//! Size-constrained optimization loop.
//!
//! The optimizer runs a linear search over a single parameter: a resize
//! ratio that starts at 1.0 and drops by a fixed increment after every
//! oversized round. Each round resizes the decoded source (round 0 passes it
//! through untouched), re-encodes at a fixed quality, and measures the
//! result; the first candidate at or under the byte threshold wins.
//!
//! The search is bounded twice over: by a hard round cap and by the 1x1
//! dimension floor. Hitting either aborts with
//! [`OptimizeError::ThresholdUnreachable`] rather than looping forever on an
//! image that cannot be squeezed under the threshold.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::decode::{self, DecodeError, FilterType};
use crate::encode::{self, EncodeError, EncodedImage, OutputFormat};
use crate::scratch::{ScratchError, ScratchStore};

/// Default lossy encoding quality.
pub const DEFAULT_QUALITY: u8 = 80;
/// Default ratio step between rounds.
pub const DEFAULT_INCREMENT: f64 = 0.01;
/// Default byte threshold.
pub const DEFAULT_THRESHOLD: u64 = 99_000;
/// Default hard cap on rounds.
pub const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Errors that abort an optimization run.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Scratch(#[from] ScratchError),

    /// The search ran out of rounds, or the image shrank below 1x1, without
    /// any candidate meeting the threshold.
    #[error("Could not reach {threshold} bytes after {rounds} rounds (best candidate: {best_size} bytes)")]
    ThresholdUnreachable {
        threshold: u64,
        rounds: u32,
        best_size: u64,
    },
}

/// Tunables for an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Lossy encoding quality (1-100), fixed for the whole run.
    pub quality: u8,
    /// How much the ratio drops after each oversized round.
    pub increment: f64,
    /// Maximum acceptable encoded size in bytes.
    pub threshold: u64,
    /// Hard cap on rounds before the run is declared unreachable.
    pub max_rounds: u32,
    /// Explicit target width, overriding ratio-based scaling on the first
    /// round. Must be paired with `height`.
    pub width: Option<u32>,
    /// Explicit target height, paired with `width`.
    pub height: Option<u32>,
    /// Output encoding. JPEG unless the caller keeps an alpha-capable
    /// source format.
    pub format: OutputFormat,
    /// Resampling filter for shrink rounds.
    pub filter: FilterType,
    /// Parent directory for the scratch store. `None` uses the system
    /// temporary directory.
    pub scratch_root: Option<PathBuf>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            increment: DEFAULT_INCREMENT,
            threshold: DEFAULT_THRESHOLD,
            max_rounds: DEFAULT_MAX_ROUNDS,
            width: None,
            height: None,
            format: OutputFormat::Jpeg,
            filter: FilterType::Lanczos3,
            scratch_root: None,
        }
    }
}

/// The accepted candidate from a finished run.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    /// Encoded payload that met the threshold.
    pub image: EncodedImage,
    /// Width of the accepted candidate.
    pub width: u32,
    /// Height of the accepted candidate.
    pub height: u32,
    /// Ratio the accepted round ran at.
    pub ratio: f64,
    /// Rounds that ran before acceptance (0 = accepted unresized).
    pub rounds: u32,
    /// Byte length of the caller's input, as passed in - not a re-encode.
    pub original_size: u64,
}

impl OptimizedImage {
    /// Size of the accepted payload in bytes.
    pub fn size(&self) -> u64 {
        self.image.len() as u64
    }

    /// File extension matching the output format, without the dot.
    pub fn extension(&self) -> &'static str {
        self.image.format().extension()
    }
}

/// Linear-search optimizer: re-encode at a shrinking ratio until the result
/// fits the byte budget.
///
/// An optimizer holds no per-call state; parallel callers should still use
/// independent instances, as each `optimize` call owns its own scratch
/// directory.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Shrink `bytes` until the encoded result fits the configured
    /// threshold.
    ///
    /// `filename` is used only for naming scratch entries; it does not need
    /// to exist on disk.
    ///
    /// # Errors
    ///
    /// Decode, encode, and scratch failures propagate immediately;
    /// [`OptimizeError::ThresholdUnreachable`] reports a search that hit the
    /// round cap or the 1x1 dimension floor.
    pub fn optimize(&self, bytes: &[u8], filename: &str) -> Result<OptimizedImage, OptimizeError> {
        let cfg = &self.config;
        let original_size = bytes.len() as u64;
        info!(
            filename,
            original_size,
            threshold = cfg.threshold,
            quality = cfg.quality,
            "optimizing image"
        );

        let source = decode::decode_image(bytes)?;
        let (orig_width, orig_height) = source.dimensions();
        debug!(width = orig_width, height = orig_height, "decoded source");

        let scratch = match &cfg.scratch_root {
            Some(root) => ScratchStore::in_dir(root)?,
            None => ScratchStore::new()?,
        };
        let entry_name = scratch_entry_name(filename, cfg.format);

        let mut best_size = original_size;
        for round in 0..cfg.max_rounds {
            let ratio = 1.0 - f64::from(round) * cfg.increment;
            if ratio <= 0.0 {
                return Err(OptimizeError::ThresholdUnreachable {
                    threshold: cfg.threshold,
                    rounds: round,
                    best_size,
                });
            }

            // Round 0 takes the explicit override if one is configured;
            // otherwise ratio 1.0 skips resizing entirely by contract.
            let explicit = (ratio >= 1.0).then(|| cfg.width.zip(cfg.height)).flatten();
            let candidate = if let Some((width, height)) = explicit {
                decode::resize(&source, width, height, cfg.filter)?
            } else if ratio < 1.0 {
                let (width, height) = decode::scaled_dimensions(orig_width, orig_height, ratio);
                if width == 0 || height == 0 {
                    return Err(OptimizeError::ThresholdUnreachable {
                        threshold: cfg.threshold,
                        rounds: round,
                        best_size,
                    });
                }
                decode::resize(&source, width, height, cfg.filter)?
            } else {
                source.clone()
            };

            let encoded = encode::encode(&candidate, cfg.format, cfg.quality)?;

            // Spill and measure through the filesystem, then clean up the
            // entry; the store itself is removed when it goes out of scope.
            let spilled = scratch.write(&entry_name, encoded.as_bytes())?;
            let size = scratch.measure(&spilled)?;
            scratch.remove(&spilled)?;
            debug_assert_eq!(size, encoded.len() as u64);

            let change_pct =
                (size as f64 - original_size as f64) / original_size as f64 * 100.0;
            debug!(round, ratio, size, change_pct, "round finished");

            if size > cfg.threshold {
                best_size = best_size.min(size);
                continue;
            }

            info!(rounds = round, ratio, size, "optimization complete");
            return Ok(OptimizedImage {
                width: candidate.width,
                height: candidate.height,
                image: encoded,
                ratio,
                rounds: round,
                original_size,
            });
        }

        Err(OptimizeError::ThresholdUnreachable {
            threshold: cfg.threshold,
            rounds: cfg.max_rounds,
            best_size,
        })
    }
}

/// Scratch entry name derived from the caller's filename and the output
/// format.
fn scratch_entry_name(filename: &str, format: OutputFormat) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    format!("{stem}_compressed.{}", format.extension())
}
