//! Process exit codes reported back to Lidarr.
//!
//! The numeric values are part of the hook's public contract and must not change.

use std::fmt;

/// Exit status of a hook run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// Success, or a Lidarr `Test` event.
    Success = 0,
    /// No audio tracks detected.
    NoTracks = 1,
    /// ffmpeg (or ffprobe) not found.
    EncoderMissing = 2,
    /// Invalid command line arguments.
    BadArguments = 3,
    /// Log file is not writable.
    LogNotWritable = 4,
    /// Specified audio file or folder not found.
    FileNotFound = 5,
    /// Error when creating an output directory.
    OutputDirectory = 6,
    /// Unknown or missing `lidarr_eventtype`.
    UnknownEvent = 7,
    /// General error in the file conversion loop.
    ConversionLoop = 10,
    /// Source and destination have the same file name.
    NameCollision = 11,
    /// ffprobe returned an error.
    ProbeError = 12,
    /// ffmpeg returned an error.
    EncodeError = 13,
    /// The new file could not be found or is zero bytes.
    OutputMissing = 14,
    /// Could not set permissions on or access a file.
    PermissionError = 15,
    /// Could not delete the original file.
    DeleteError = 16,
    /// Lidarr API error.
    LidarrApi = 17,
    /// Timed out waiting on a Lidarr job.
    LidarrTimeout = 18,
    /// General error.
    General = 20,
}

impl ExitCode {
    /// Numeric process exit status.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
