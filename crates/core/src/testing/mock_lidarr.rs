//! Mock Lidarr API for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::lidarr::{
    JobOutcome, LidarrApi, LidarrError, ManualImportItem, TrackDeletion, TrackFile,
};

/// A recorded Lidarr call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LidarrCall {
    GetVersion,
    GetTrackFileInfo {
        artist_id: i64,
        album_id: i64,
    },
    DeleteTrack {
        track_id: i64,
        path: PathBuf,
    },
    GetImportInfo {
        artist_id: i64,
        folder: PathBuf,
        download_id: Option<String>,
        album_id: i64,
    },
    ImportTracks {
        items: Vec<PathBuf>,
        album_path: PathBuf,
    },
    CheckJob {
        job_id: i64,
    },
}

impl LidarrCall {
    /// Name of the API operation.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::GetVersion => "get_version",
            Self::GetTrackFileInfo { .. } => "get_trackfile_info",
            Self::DeleteTrack { .. } => "delete_track",
            Self::GetImportInfo { .. } => "get_import_info",
            Self::ImportTracks { .. } => "import_tracks",
            Self::CheckJob { .. } => "check_job",
        }
    }

    /// Whether the call changes state on the Lidarr side.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::DeleteTrack { .. } | Self::GetImportInfo { .. } | Self::ImportTracks { .. }
        )
    }
}

/// Mock implementation of the LidarrApi trait.
///
/// Provides controllable behavior for testing:
/// - Track every call for assertions
/// - Configure track files, import candidates and the job outcome
/// - Fail any operation by name
///
/// # Example
///
/// ```rust,ignore
/// let lidarr = MockLidarr::new();
/// lidarr.set_job_outcome(JobOutcome::Failed).await;
/// lidarr.fail_on("get_version", LidarrError::Timeout).await;
///
/// // ... run the hook ...
///
/// assert!(lidarr.calls().await.is_empty());
/// ```
#[derive(Debug)]
pub struct MockLidarr {
    calls: Arc<RwLock<Vec<LidarrCall>>>,
    track_files: Arc<RwLock<Vec<TrackFile>>>,
    import_candidates: Arc<RwLock<Vec<ManualImportItem>>>,
    job_outcome: Arc<RwLock<JobOutcome>>,
    /// Errors keyed by operation name. Each fires once.
    errors: Arc<RwLock<HashMap<&'static str, LidarrError>>>,
    next_job_id: Arc<RwLock<i64>>,
}

impl Default for MockLidarr {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLidarr {
    /// Create a new mock whose jobs complete.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            track_files: Arc::new(RwLock::new(Vec::new())),
            import_candidates: Arc::new(RwLock::new(Vec::new())),
            job_outcome: Arc::new(RwLock::new(JobOutcome::Completed)),
            errors: Arc::new(RwLock::new(HashMap::new())),
            next_job_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Get all recorded calls.
    pub async fn calls(&self) -> Vec<LidarrCall> {
        self.calls.read().await.clone()
    }

    /// Names of the recorded operations, in call order.
    pub async fn operations(&self) -> Vec<&'static str> {
        self.calls.read().await.iter().map(|c| c.operation()).collect()
    }

    pub async fn set_track_files(&self, files: Vec<TrackFile>) {
        *self.track_files.write().await = files;
    }

    pub async fn set_import_candidates(&self, items: Vec<ManualImportItem>) {
        *self.import_candidates.write().await = items;
    }

    pub async fn set_job_outcome(&self, outcome: JobOutcome) {
        *self.job_outcome.write().await = outcome;
    }

    /// Make the operation named `operation` fail once with `error`.
    pub async fn fail_on(&self, operation: &'static str, error: LidarrError) {
        self.errors.write().await.insert(operation, error);
    }

    async fn record(&self, call: LidarrCall) -> Result<(), LidarrError> {
        let operation = call.operation();
        self.calls.write().await.push(call);
        match self.errors.write().await.remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LidarrApi for MockLidarr {
    async fn get_version(&self) -> Result<String, LidarrError> {
        self.record(LidarrCall::GetVersion).await?;
        Ok("2.0.0.0-mock".to_string())
    }

    async fn get_trackfile_info(
        &self,
        artist_id: i64,
        album_id: i64,
    ) -> Result<Vec<TrackFile>, LidarrError> {
        self.record(LidarrCall::GetTrackFileInfo { artist_id, album_id })
            .await?;
        Ok(self.track_files.read().await.clone())
    }

    async fn delete_track(
        &self,
        track_id: i64,
        file_path: &Path,
    ) -> Result<TrackDeletion, LidarrError> {
        self.record(LidarrCall::DeleteTrack {
            track_id,
            path: file_path.to_path_buf(),
        })
        .await?;
        Ok(TrackDeletion::Remote)
    }

    async fn get_import_info(
        &self,
        artist_id: i64,
        folder: &Path,
        download_id: Option<&str>,
        album_id: i64,
    ) -> Result<Vec<ManualImportItem>, LidarrError> {
        self.record(LidarrCall::GetImportInfo {
            artist_id,
            folder: folder.to_path_buf(),
            download_id: download_id.map(str::to_string),
            album_id,
        })
        .await?;
        Ok(self.import_candidates.read().await.clone())
    }

    async fn import_tracks(
        &self,
        items: &[ManualImportItem],
        album_path: &Path,
    ) -> Result<i64, LidarrError> {
        self.record(LidarrCall::ImportTracks {
            items: items.iter().map(|i| i.path.clone()).collect(),
            album_path: album_path.to_path_buf(),
        })
        .await?;
        let mut next = self.next_job_id.write().await;
        let id = *next;
        *next += 1;
        Ok(id)
    }

    async fn check_job(&self, job_id: i64) -> Result<JobOutcome, LidarrError> {
        self.record(LidarrCall::CheckJob { job_id }).await?;
        Ok(self.job_outcome.read().await.clone())
    }
}
