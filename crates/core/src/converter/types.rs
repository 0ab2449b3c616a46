//! Types for the converter module.

use std::path::{Path, PathBuf};

use super::error::ConverterError;
use crate::exit::ExitCode;

/// A single file to transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    /// Lossless source file.
    pub source: PathBuf,
    /// Where the encoded file goes.
    pub output: PathBuf,
}

/// Result of a successful (or skipped) transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// The encoder ran and produced `output`.
    Converted {
        output: PathBuf,
        /// Image embedded as cover art, if one was found.
        cover_art: Option<PathBuf>,
    },
    /// `output` already existed and was reused without encoding.
    Reused { output: PathBuf },
    /// Dry run: `output` is where the file would have been written.
    Planned { output: PathBuf },
    /// Zero-byte source; never handed to the encoder.
    SkippedEmpty,
}

impl TranscodeOutcome {
    /// The output path when there is one to import.
    pub fn output(&self) -> Option<&Path> {
        match self {
            Self::Converted { output, .. } | Self::Reused { output } | Self::Planned { output } => {
                Some(output)
            }
            Self::SkippedEmpty => None,
        }
    }
}

/// Outcome for one source file in a batch.
#[derive(Debug)]
pub struct ConversionEntry {
    pub source: PathBuf,
    pub result: Result<TranscodeOutcome, ConverterError>,
}

impl ConversionEntry {
    /// Output path when the file converted (or was reused / planned).
    pub fn output(&self) -> Option<&Path> {
        self.result.as_ref().ok().and_then(|o| o.output())
    }
}

/// Per-file results of converting a folder, in processing order.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub entries: Vec<ConversionEntry>,
}

impl ConversionReport {
    pub fn push(&mut self, source: PathBuf, result: Result<TranscodeOutcome, ConverterError>) {
        self.entries.push(ConversionEntry { source, result });
    }

    /// `(source, output)` for every file that has an output.
    pub fn succeeded(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .filter_map(|e| e.output().map(|o| (e.source.as_path(), o)))
    }

    /// Entries whose transcode returned an error.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ConverterError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|err| (e.source.as_path(), err)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exit code of the first failure, if any file failed.
    pub fn first_failure_code(&self) -> Option<ExitCode> {
        self.failures().next().map(|(_, e)| e.exit_code())
    }
}

/// Information about a media file from ffprobe.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    /// Container format name (first entry of ffprobe's `format_name`).
    pub format: String,
    pub duration_secs: f64,
    pub audio_codec: Option<String>,
    pub audio_sample_rate: Option<u32>,
    pub audio_channels: Option<u8>,
    /// Whether an image/video stream (embedded art) is present.
    pub has_video_stream: bool,
}
