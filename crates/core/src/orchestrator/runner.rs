//! Hook runner implementation.
//!
//! One invocation handles one Lidarr event in a single sequential pass:
//! discover, transcode, hand the results back to Lidarr, wait for the import.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::converter::{convert_all, ConversionReport, ConverterConfig, Transcoder};
use crate::discovery::discover_files;
use crate::event::{EventType, LidarrEvent};
use crate::exit::ExitCode;
use crate::lidarr::{LidarrApi, ManualImportItem, TrackFile};

use super::types::{HookError, RunOutcome};

/// Runs the hook for one event against a transcoder and a Lidarr API.
pub struct HookRunner {
    config: Config,
    converter_config: ConverterConfig,
    transcoder: Arc<dyn Transcoder>,
    lidarr: Arc<dyn LidarrApi>,
}

impl HookRunner {
    /// Create a new runner.
    pub fn new(config: Config, transcoder: Arc<dyn Transcoder>, lidarr: Arc<dyn LidarrApi>) -> Self {
        let converter_config = ConverterConfig::from(&config);
        Self {
            config,
            converter_config,
            transcoder,
            lidarr,
        }
    }

    /// Handle `event` and report how the run ended.
    pub async fn run(&self, event: &LidarrEvent) -> RunOutcome {
        match &event.event_type {
            EventType::Test => {
                info!("Lidarr test event received, nothing to do");
                RunOutcome::exit(ExitCode::Success)
            }
            EventType::AlbumDownload => {
                let mut outcome = RunOutcome::exit(ExitCode::Success);
                if let Err(e) = self.album_download(event, &mut outcome).await {
                    error!(error = %e, exit_code = e.exit_code().code(), "Hook run failed");
                    outcome.exit_code = e.exit_code();
                }
                outcome
            }
            EventType::Other(other) => {
                warn!(event_type = %other, "Unhandled Lidarr event type");
                RunOutcome::exit(ExitCode::UnknownEvent)
            }
        }
    }

    async fn album_download(
        &self,
        event: &LidarrEvent,
        outcome: &mut RunOutcome,
    ) -> Result<(), HookError> {
        info!(
            artist = event.artist.name.as_deref().unwrap_or("unknown"),
            album = event.album.title.as_deref().unwrap_or("unknown"),
            tracks = event.added_track_paths.len(),
            "Album download event"
        );

        if event.added_track_paths.is_empty() {
            return Err(HookError::NoTracks);
        }

        self.transcoder.validate().await?;
        self.lidarr.get_version().await?;

        let album_folder = event
            .album_folder()
            .ok_or(HookError::NoTracks)?;
        if !album_folder.is_dir() {
            return Err(HookError::AlbumFolderNotFound(album_folder));
        }

        let artist_id = event.artist.id.ok_or(HookError::MissingField("lidarr_artist_id"))?;
        let album_id = event.album.id.ok_or(HookError::MissingField("lidarr_album_id"))?;

        let track_files = self.lidarr.get_trackfile_info(artist_id, album_id).await?;

        let files = discover_files(&album_folder, &self.config.source.normalized_extensions());
        if files.is_empty() {
            return Err(HookError::NoTracks);
        }

        let source_root = self.source_root(&album_folder);
        info!(
            transcoder = self.transcoder.name(),
            files = files.len(),
            "Converting album"
        );
        let report = convert_all(
            self.transcoder.as_ref(),
            &files,
            &source_root,
            &self.converter_config,
        )
        .await;

        outcome.converted = report.success_count();
        outcome.failed = report.failure_count();

        if report.success_count() == 0 {
            if let Some(code) = report.first_failure_code() {
                outcome.exit_code = code;
                return Ok(());
            }
            info!("Nothing to import");
            return Ok(());
        }

        if self.converter_config.dry_run {
            info!(files = report.success_count(), "Dry run, skipping Lidarr import");
            return Ok(());
        }

        if self.config.source.delete_original_file {
            self.delete_track_records(&report, &track_files).await?;
        }

        let import_folder = Self::import_folder(&report, &album_folder);
        let candidates = self
            .lidarr
            .get_import_info(
                artist_id,
                &import_folder,
                event.download_id.as_deref(),
                album_id,
            )
            .await?;
        let items = Self::matching_candidates(candidates, &report);

        let job_id = self.lidarr.import_tracks(&items, &import_folder).await?;
        outcome.import_job = Some(job_id);

        let job = self.lidarr.check_job(job_id).await?;
        outcome.exit_code = job.exit_code();
        outcome.job_outcome = Some(job);

        Ok(())
    }

    /// Root the destination tree mirrors from.
    fn source_root(&self, album_folder: &Path) -> PathBuf {
        match &self.config.source.folder {
            Some(root) if album_folder.starts_with(root) => root.clone(),
            _ => album_folder
                .parent()
                .unwrap_or(album_folder)
                .to_path_buf(),
        }
    }

    /// Folder holding the new files, as Lidarr should scan it.
    fn import_folder(report: &ConversionReport, album_folder: &Path) -> PathBuf {
        report
            .succeeded()
            .next()
            .and_then(|(_, output)| output.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| album_folder.to_path_buf())
    }

    /// Delete Lidarr's records for converted originals, matched by path.
    async fn delete_track_records(
        &self,
        report: &ConversionReport,
        track_files: &[TrackFile],
    ) -> Result<(), HookError> {
        for (source, _) in report.succeeded() {
            match track_files.iter().find(|t| t.path == source) {
                Some(track) => {
                    let how = self.lidarr.delete_track(track.id, source).await?;
                    debug!(track_id = track.id, ?how, "Removed original track record");
                }
                None => {
                    debug!(source = %source.display(), "No Lidarr track record for original");
                }
            }
        }
        Ok(())
    }

    /// Keep manual-import candidates that are our outputs. Falls back to all
    /// candidates when none match by path.
    fn matching_candidates(
        candidates: Vec<ManualImportItem>,
        report: &ConversionReport,
    ) -> Vec<ManualImportItem> {
        let outputs: HashSet<&Path> = report.succeeded().map(|(_, output)| output).collect();
        let total = candidates.len();

        let (matching, others): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|item| outputs.contains(item.path.as_path()));

        for item in matching.iter().filter(|i| !i.rejections.is_empty()) {
            warn!(path = %item.path.display(), rejections = ?item.rejections, "Import candidate has rejections");
        }

        debug!(total, matching = matching.len(), "Import candidates");
        if matching.is_empty() {
            others
        } else {
            matching
        }
    }
}
