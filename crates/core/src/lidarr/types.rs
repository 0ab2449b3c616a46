//! Lidarr API types, errors and the client trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exit::ExitCode;

/// Errors from Lidarr operations.
#[derive(Debug, Error)]
pub enum LidarrError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Lidarr API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to delete local file {path}: {source}")]
    LocalDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LidarrError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::LocalDelete { .. } => ExitCode::DeleteError,
            _ => ExitCode::LidarrApi,
        }
    }
}

/// A track file Lidarr has on record for an album.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackFile {
    pub id: i64,
    pub path: PathBuf,
    #[serde(default)]
    pub artist_id: Option<i64>,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub album_release_id: Option<i64>,
    /// Passed through untouched.
    #[serde(default)]
    pub quality: Option<serde_json::Value>,
    #[serde(default)]
    pub track_ids: Vec<i64>,
    #[serde(default)]
    pub size: u64,
}

/// Reference to a Lidarr entity by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntityRef {
    pub id: i64,
}

/// A candidate returned by `GET /manualimport`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualImportItem {
    pub path: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub artist: Option<EntityRef>,
    #[serde(default)]
    pub album: Option<EntityRef>,
    #[serde(default)]
    pub album_release_id: Option<i64>,
    #[serde(default)]
    pub tracks: Vec<EntityRef>,
    #[serde(default)]
    pub quality: Option<serde_json::Value>,
    #[serde(default)]
    pub download_id: Option<String>,
    #[serde(default)]
    pub disable_release_switching: bool,
    #[serde(default)]
    pub rejections: Vec<serde_json::Value>,
}

/// One file in a `ManualImport` command body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualImportFile {
    pub path: PathBuf,
    pub artist_id: Option<i64>,
    pub album_id: Option<i64>,
    pub album_release_id: Option<i64>,
    pub track_ids: Vec<i64>,
    pub quality: Option<serde_json::Value>,
    pub download_id: Option<String>,
    pub disable_release_switching: bool,
}

impl From<&ManualImportItem> for ManualImportFile {
    fn from(item: &ManualImportItem) -> Self {
        Self {
            path: item.path.clone(),
            artist_id: item.artist.map(|a| a.id),
            album_id: item.album.map(|a| a.id),
            album_release_id: item.album_release_id,
            track_ids: item.tracks.iter().map(|t| t.id).collect(),
            quality: item.quality.clone(),
            download_id: item.download_id.clone(),
            disable_release_switching: item.disable_release_switching,
        }
    }
}

/// Body of `POST /command`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name")]
pub enum CommandRequest {
    #[serde(rename_all = "camelCase")]
    RefreshAlbum { album_id: i64 },
    DownloadedAlbumsScan { path: PathBuf },
    #[serde(rename_all = "camelCase")]
    ManualImport {
        files: Vec<ManualImportFile>,
        import_mode: String,
        replace_existing_files: bool,
    },
}

impl CommandRequest {
    pub fn manual_import(items: &[ManualImportItem]) -> Self {
        Self::ManualImport {
            files: items.iter().map(ManualImportFile::from).collect(),
            import_mode: "auto".to_string(),
            replace_existing_files: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RefreshAlbum { .. } => "RefreshAlbum",
            Self::DownloadedAlbumsScan { .. } => "DownloadedAlbumsScan",
            Self::ManualImport { .. } => "ManualImport",
        }
    }
}

/// A command as reported by `/command`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResource {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Status of a Lidarr command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Started,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "queued" => Self::Queued,
            "started" => Self::Started,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether polling stops at this status. `Queued` stops too: a queued
    /// job is left to Lidarr rather than waited out.
    pub fn stops_polling(&self) -> bool {
        matches!(self, Self::Queued | Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }
}

/// Final result of polling a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Queued,
    Failed,
    TimedOut { last_status: Option<JobStatus> },
}

impl JobOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Completed | Self::Queued => ExitCode::Success,
            Self::Failed => ExitCode::LidarrApi,
            Self::TimedOut { .. } => ExitCode::LidarrTimeout,
        }
    }
}

/// How a track file was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackDeletion {
    /// Lidarr deleted the record and the file.
    Remote,
    /// Lidarr refused; the local file was removed directly.
    LocalFallback,
}

/// Operations the hook performs against Lidarr.
#[async_trait]
pub trait LidarrApi: Send + Sync {
    /// Returns the server version from `/system/status`.
    async fn get_version(&self) -> Result<String, LidarrError>;

    async fn get_trackfile_info(
        &self,
        artist_id: i64,
        album_id: i64,
    ) -> Result<Vec<TrackFile>, LidarrError>;

    /// Deletes a track file, falling back to removing `file_path` locally.
    async fn delete_track(
        &self,
        track_id: i64,
        file_path: &Path,
    ) -> Result<TrackDeletion, LidarrError>;

    /// Refreshes the album, then lists manual-import candidates in `folder`.
    async fn get_import_info(
        &self,
        artist_id: i64,
        folder: &Path,
        download_id: Option<&str>,
        album_id: i64,
    ) -> Result<Vec<ManualImportItem>, LidarrError>;

    /// Submits the import command and returns its id.
    async fn import_tracks(
        &self,
        items: &[ManualImportItem],
        album_path: &Path,
    ) -> Result<i64, LidarrError>;

    /// Polls a command until it stops or the attempt budget runs out.
    async fn check_job(&self, job_id: i64) -> Result<JobOutcome, LidarrError>;
}
