//! Converter module for transcoding lossless audio.
//!
//! This module provides the `Transcoder` trait and an FFmpeg implementation that
//! encodes FLAC/WAV sources into the configured lossy format.
//!
//! # Features
//!
//! - Fixed-shape ffmpeg command (audio re-encode at 44.1 kHz, embedded art copied)
//! - Existing outputs reused instead of re-encoded
//! - Cover art from `front`/`folder`/`cover` images embedded with lofty
//! - Optional truncation or deletion of the source afterwards
//!
//! # Example
//!
//! ```ignore
//! use flacarr_core::converter::{convert_all, ConverterConfig, FfmpegTranscoder, Transcoder};
//!
//! let config = ConverterConfig::default();
//! let transcoder = FfmpegTranscoder::new(config.clone());
//! transcoder.validate().await?;
//!
//! let report = convert_all(&transcoder, &files, album_dir, &config).await;
//! for (source, output) in report.succeeded() {
//!     println!("{} -> {}", source.display(), output.display());
//! }
//! ```

mod batch;
mod config;
mod cover_art;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use batch::{convert_all, plan_output};
pub use config::{ConverterConfig, OUTPUT_SAMPLE_RATE_HZ};
pub use cover_art::{embed_cover_art, find_cover_art, find_cover_in};
pub use error::ConverterError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{ConversionEntry, ConversionReport, MediaInfo, TranscodeJob, TranscodeOutcome};
