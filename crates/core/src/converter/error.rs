//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use crate::exit::ExitCode;

/// Errors that can occur while transcoding a single file.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Source and output are the same file.
    #[error("Source and destination are the same file: {path}")]
    SameFile { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ffprobe could not read the media file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// Encoder process failed.
    #[error("Encoding failed: {reason}")]
    EncodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Encoding timed out.
    #[error("Encoding timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Encoder reported success but the output is missing or empty.
    #[error("Output missing or empty: {path}")]
    OutputMissing { path: PathBuf },

    /// Cover art embedding failed.
    #[error("Failed to embed cover art: {reason}")]
    CoverArtFailed { reason: String },

    /// Permission denied while truncating or deleting the source.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Could not truncate or delete the source.
    #[error("Failed to remove original file {path}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new encode failed error with stderr output.
    pub fn encode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EncodeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new `ProbeFailed` error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new cover art error.
    pub fn cover_art_failed(reason: impl Into<String>) -> Self {
        Self::CoverArtFailed {
            reason: reason.into(),
        }
    }

    /// Maps a failed removal of the source to the matching variant.
    pub fn disposal(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::DeleteFailed { path, source }
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FfmpegNotFound { .. } | Self::FfprobeNotFound { .. } => ExitCode::EncoderMissing,
            Self::InputNotFound { .. } => ExitCode::FileNotFound,
            Self::SameFile { .. } => ExitCode::NameCollision,
            Self::OutputDirectoryFailed { .. } => ExitCode::OutputDirectory,
            Self::ProbeFailed { .. } => ExitCode::ProbeError,
            Self::EncodeFailed { .. } | Self::Timeout { .. } => ExitCode::EncodeError,
            Self::OutputMissing { .. } => ExitCode::OutputMissing,
            Self::PermissionDenied { .. } => ExitCode::PermissionError,
            Self::DeleteFailed { .. } => ExitCode::DeleteError,
            Self::CoverArtFailed { .. } | Self::Io(_) => ExitCode::ConversionLoop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg")
            }
            .exit_code(),
            ExitCode::EncoderMissing
        );
        assert_eq!(
            ConverterError::encode_failed("boom", None).exit_code(),
            ExitCode::EncodeError
        );
        assert_eq!(
            ConverterError::probe_failed("bad").exit_code(),
            ExitCode::ProbeError
        );
        assert_eq!(
            ConverterError::Io(io::Error::other("x")).exit_code(),
            ExitCode::ConversionLoop
        );
    }

    #[test]
    fn test_disposal_maps_permission_denied() {
        let path = PathBuf::from("/music/a.flac");
        let err = ConverterError::disposal(
            path.clone(),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ConverterError::PermissionDenied { .. }));
        assert_eq!(err.exit_code(), ExitCode::PermissionError);

        let err = ConverterError::disposal(path, io::Error::other("busy"));
        assert!(matches!(err, ConverterError::DeleteFailed { .. }));
        assert_eq!(err.exit_code(), ExitCode::DeleteError);
    }
}
