//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the transcoder and Lidarr traits,
//! allowing the hook runner to be exercised without ffmpeg or a Lidarr server.
//!
//! # Example
//!
//! ```rust,ignore
//! use flacarr_core::testing::{MockLidarr, MockTranscoder};
//!
//! let transcoder = Arc::new(MockTranscoder::new());
//! let lidarr = Arc::new(MockLidarr::new());
//! lidarr.set_job_outcome(JobOutcome::TimedOut { last_status: None }).await;
//!
//! let runner = HookRunner::new(config, transcoder.clone(), lidarr.clone());
//! let outcome = runner.run(&event).await;
//! ```

mod mock_lidarr;
mod mock_transcoder;

pub use mock_lidarr::{LidarrCall, MockLidarr};
pub use mock_transcoder::MockTranscoder;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::config::{load_config_from_str, Config};
    use crate::event::LidarrEvent;
    use crate::lidarr::{EntityRef, ManualImportItem, TrackFile};

    /// Minimal valid configuration pointing at a local Lidarr.
    pub fn config() -> Config {
        config_with("")
    }

    /// Minimal configuration with extra TOML sections prepended.
    pub fn config_with(extra: &str) -> Config {
        load_config_from_str(&format!(
            "{}\n[lidarr]\nurl = \"http://localhost\"\napi_key = \"test-key\"\n",
            extra
        ))
        .unwrap()
    }

    /// An `AlbumDownload` event for the given added tracks.
    pub fn album_download_event(tracks: &[PathBuf]) -> LidarrEvent {
        let joined = tracks
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("|");

        LidarrEvent::from_vars([
            ("lidarr_eventtype", "AlbumDownload".to_string()),
            ("lidarr_artist_id", "1".to_string()),
            ("lidarr_artist_name", "Test Artist".to_string()),
            ("lidarr_album_id", "2".to_string()),
            ("lidarr_album_title", "Test Album".to_string()),
            ("lidarr_download_id", "download-1".to_string()),
            ("lidarr_addedtrackpaths", joined),
        ])
        .unwrap()
    }

    /// A Lidarr track file record.
    pub fn track_file(id: i64, path: &Path) -> TrackFile {
        TrackFile {
            id,
            path: path.to_path_buf(),
            artist_id: Some(1),
            album_id: Some(2),
            album_release_id: Some(3),
            quality: None,
            track_ids: vec![id * 10],
            size: 1024,
        }
    }

    /// A manual-import candidate for `path`.
    pub fn import_candidate(path: &Path, track_id: i64) -> ManualImportItem {
        ManualImportItem {
            path: path.to_path_buf(),
            name: path.file_stem().map(|s| s.to_string_lossy().to_string()),
            size: 1024,
            artist: Some(EntityRef { id: 1 }),
            album: Some(EntityRef { id: 2 }),
            album_release_id: Some(3),
            tracks: vec![EntityRef { id: track_id }],
            quality: None,
            download_id: Some("download-1".to_string()),
            disable_release_switching: false,
            rejections: Vec::new(),
        }
    }
}
