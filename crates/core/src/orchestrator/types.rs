//! Types for the hook runner.

use std::path::PathBuf;

use thiserror::Error;

use crate::converter::ConverterError;
use crate::exit::ExitCode;
use crate::lidarr::{JobOutcome, LidarrError};

/// Errors that end a hook run early.
#[derive(Debug, Error)]
pub enum HookError {
    /// The event lists no added tracks, or the album folder has no sources.
    #[error("no audio tracks detected")]
    NoTracks,

    /// A field the event type requires is missing.
    #[error("event is missing {0}")]
    MissingField(&'static str),

    /// The album folder named by the event does not exist.
    #[error("album folder not found: {0}")]
    AlbumFolderNotFound(PathBuf),

    /// Converter error outside the per-file loop.
    #[error("converter error: {0}")]
    Converter(#[from] ConverterError),

    /// Lidarr API error.
    #[error("lidarr error: {0}")]
    Lidarr(#[from] LidarrError),
}

impl HookError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::NoTracks => ExitCode::NoTracks,
            Self::MissingField(_) => ExitCode::UnknownEvent,
            Self::AlbumFolderNotFound(_) => ExitCode::FileNotFound,
            Self::Converter(e) => e.exit_code(),
            Self::Lidarr(e) => e.exit_code(),
        }
    }
}

/// Summary of a finished hook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: ExitCode,
    /// Files that produced (or would produce) an output.
    pub converted: usize,
    /// Files whose conversion failed.
    pub failed: usize,
    /// Import command submitted to Lidarr, if any.
    pub import_job: Option<i64>,
    pub job_outcome: Option<JobOutcome>,
}

impl RunOutcome {
    /// A run that ended without converting anything.
    pub fn exit(exit_code: ExitCode) -> Self {
        Self {
            exit_code,
            converted: 0,
            failed: 0,
            import_job: None,
            job_outcome: None,
        }
    }
}
