//! Hook lifecycle integration tests.
//!
//! These tests drive the hook runner with a mock transcoder and mock Lidarr:
//! - Event type dispatch (Test, AlbumDownload, unknown)
//! - Discovery and conversion of an album folder
//! - Import submission and job outcome mapping
//! - Exit codes for each way a run can end

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use flacarr_core::{
    converter::ConverterError,
    lidarr::{JobOutcome, JobStatus, LidarrError},
    testing::{fixtures, LidarrCall, MockLidarr, MockTranscoder},
    Config, EventError, ExitCode, HookRunner, LidarrEvent,
};

/// Test helper holding the runner, its mocks and an album folder on disk.
struct TestHarness {
    runner: HookRunner,
    transcoder: Arc<MockTranscoder>,
    lidarr: Arc<MockLidarr>,
    album_dir: PathBuf,
    _library: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(fixtures::config())
    }

    fn with_config(config: Config) -> Self {
        let library = TempDir::new().expect("Failed to create library dir");
        let album_dir = library.path().join("Test Artist").join("Test Album");
        std::fs::create_dir_all(&album_dir).expect("Failed to create album dir");

        let transcoder = Arc::new(MockTranscoder::new());
        let lidarr = Arc::new(MockLidarr::new());
        let runner = HookRunner::new(config, transcoder.clone(), lidarr.clone());

        Self {
            runner,
            transcoder,
            lidarr,
            album_dir,
            _library: library,
        }
    }

    /// Write a fake lossless track into the album folder.
    fn add_track(&self, name: &str) -> PathBuf {
        let path = self.album_dir.join(name);
        std::fs::write(&path, b"fLaC").expect("Failed to write track");
        path
    }

    fn event(&self, tracks: &[PathBuf]) -> LidarrEvent {
        fixtures::album_download_event(tracks)
    }
}

#[tokio::test]
async fn test_event_has_no_side_effects() {
    let harness = TestHarness::new();
    let event = LidarrEvent::from_vars([("lidarr_eventtype", "Test")]).unwrap();

    let outcome = harness.runner.run(&event).await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
    assert!(harness.lidarr.calls().await.is_empty());
    assert_eq!(harness.transcoder.job_count().await, 0);
}

#[test]
fn test_missing_event_type_is_not_invoked() {
    let err = LidarrEvent::from_vars([("lidarr_album_id", "2")]).unwrap_err();
    assert_eq!(err, EventError::NotInvoked);
    assert_eq!(err.exit_code(), ExitCode::UnknownEvent);
}

#[tokio::test]
async fn test_unknown_event_type() {
    let harness = TestHarness::new();
    let event = LidarrEvent::from_vars([("lidarr_eventtype", "Grab")]).unwrap();

    let outcome = harness.runner.run(&event).await;

    assert_eq!(outcome.exit_code, ExitCode::UnknownEvent);
    assert!(harness.lidarr.calls().await.is_empty());
}

#[tokio::test]
async fn test_album_download_without_tracks() {
    let harness = TestHarness::new();
    harness.add_track("01.flac");

    let outcome = harness.runner.run(&harness.event(&[])).await;

    assert_eq!(outcome.exit_code, ExitCode::NoTracks);
    assert_eq!(harness.transcoder.job_count().await, 0);
    assert!(!harness
        .lidarr
        .operations()
        .await
        .contains(&"import_tracks"));
}

#[tokio::test]
async fn test_full_album_download() {
    let harness = TestHarness::new();
    let first = harness.add_track("01 - Opening.flac");
    let second = harness.add_track("02 - Closing.wav");
    std::fs::write(harness.album_dir.join("front.jpg"), b"jpeg").unwrap();
    std::fs::write(harness.album_dir.join("notes.txt"), b"liner notes").unwrap();

    let outcome = harness
        .runner
        .run(&harness.event(&[first.clone(), second.clone()]))
        .await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
    assert_eq!(outcome.converted, 2);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.import_job, Some(1));
    assert_eq!(outcome.job_outcome, Some(JobOutcome::Completed));

    let jobs = harness.transcoder.jobs().await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].source, first);
    assert_eq!(jobs[0].output, harness.album_dir.join("01 - Opening.mp4"));
    assert_eq!(jobs[1].output, harness.album_dir.join("02 - Closing.mp4"));

    assert_eq!(
        harness.lidarr.operations().await,
        vec![
            "get_version",
            "get_trackfile_info",
            "get_import_info",
            "import_tracks",
            "check_job"
        ]
    );

    let calls = harness.lidarr.calls().await;
    assert_eq!(
        calls[2],
        LidarrCall::GetImportInfo {
            artist_id: 1,
            folder: harness.album_dir.clone(),
            download_id: Some("download-1".to_string()),
            album_id: 2,
        }
    );
    assert_eq!(calls[4], LidarrCall::CheckJob { job_id: 1 });
}

#[tokio::test]
async fn test_outputs_mirrored_under_target_folder() {
    let library = TempDir::new().unwrap();
    let lossy = TempDir::new().unwrap();
    let config = fixtures::config_with(&format!(
        "[source]\nfolder = {:?}\n\n[target]\nfolder = {:?}\n",
        library.path(),
        lossy.path()
    ));

    let transcoder = Arc::new(MockTranscoder::new());
    let lidarr = Arc::new(MockLidarr::new());
    let runner = HookRunner::new(config, transcoder.clone(), lidarr.clone());

    let album = library.path().join("Artist").join("Album");
    std::fs::create_dir_all(&album).unwrap();
    let track = album.join("01.flac");
    std::fs::write(&track, b"fLaC").unwrap();

    let outcome = runner
        .run(&fixtures::album_download_event(&[track]))
        .await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
    let expected_dir = lossy.path().join("Artist").join("Album");
    assert_eq!(transcoder.jobs().await[0].output, expected_dir.join("01.mp4"));

    let calls = lidarr.calls().await;
    assert!(calls.iter().any(|c| matches!(
        c,
        LidarrCall::ImportTracks { album_path, .. } if album_path == &expected_dir
    )));
}

#[tokio::test]
async fn test_import_uses_candidates_matching_outputs() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    let output = harness.album_dir.join("01.mp4");
    harness
        .lidarr
        .set_import_candidates(vec![
            fixtures::import_candidate(&output, 301),
            fixtures::import_candidate(&harness.album_dir.join("01.flac"), 301),
        ])
        .await;

    harness.runner.run(&harness.event(&[track])).await;

    let calls = harness.lidarr.calls().await;
    let import = calls
        .iter()
        .find(|c| c.operation() == "import_tracks")
        .unwrap();
    assert_eq!(
        import,
        &LidarrCall::ImportTracks {
            items: vec![output],
            album_path: harness.album_dir.clone(),
        }
    );
}

#[tokio::test]
async fn test_job_timeout_exit_code() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    harness
        .lidarr
        .set_job_outcome(JobOutcome::TimedOut {
            last_status: Some(JobStatus::Started),
        })
        .await;

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::LidarrTimeout);
    assert_eq!(outcome.exit_code.code(), 18);
}

#[tokio::test]
async fn test_job_failed_exit_code() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    harness.lidarr.set_job_outcome(JobOutcome::Failed).await;

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::LidarrApi);
}

#[tokio::test]
async fn test_queued_job_is_success() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    harness.lidarr.set_job_outcome(JobOutcome::Queued).await;

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
}

#[tokio::test]
async fn test_lidarr_unreachable() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    harness
        .lidarr
        .fail_on(
            "get_version",
            LidarrError::Connection("connection refused".to_string()),
        )
        .await;

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::LidarrApi);
    assert_eq!(harness.transcoder.job_count().await, 0);
    assert_eq!(harness.lidarr.operations().await, vec!["get_version"]);
}

#[tokio::test]
async fn test_encoder_missing() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    harness
        .transcoder
        .set_validate_error(ConverterError::FfmpegNotFound {
            path: PathBuf::from("ffmpeg"),
        })
        .await;

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::EncoderMissing);
    assert!(harness.lidarr.calls().await.is_empty());
}

#[tokio::test]
async fn test_album_folder_missing() {
    let harness = TestHarness::new();
    let ghost = harness.album_dir.join("gone").join("01.flac");

    let outcome = harness.runner.run(&harness.event(&[ghost])).await;

    assert_eq!(outcome.exit_code, ExitCode::FileNotFound);
}

#[tokio::test]
async fn test_folder_without_sources() {
    let harness = TestHarness::new();
    let mp3 = harness.album_dir.join("01.mp3");
    std::fs::write(&mp3, b"ID3").unwrap();

    let outcome = harness.runner.run(&harness.event(&[mp3])).await;

    assert_eq!(outcome.exit_code, ExitCode::NoTracks);
    assert_eq!(harness.transcoder.job_count().await, 0);
}

#[tokio::test]
async fn test_all_files_failed_uses_first_failure_code() {
    let harness = TestHarness::new();
    let first = harness.add_track("01.flac");
    harness.add_track("02.flac");
    harness
        .transcoder
        .fail_on("01.flac", ConverterError::probe_failed("bad header"))
        .await;
    harness
        .transcoder
        .fail_on("02.flac", ConverterError::encode_failed("exit 1", None))
        .await;

    let outcome = harness.runner.run(&harness.event(&[first])).await;

    assert_eq!(outcome.exit_code, ExitCode::ProbeError);
    assert_eq!(outcome.failed, 2);
    assert!(!harness
        .lidarr
        .operations()
        .await
        .contains(&"import_tracks"));
}

#[tokio::test]
async fn test_partial_failure_still_imports() {
    let harness = TestHarness::new();
    let first = harness.add_track("01.flac");
    harness.add_track("02.flac");
    harness
        .transcoder
        .fail_on("02.flac", ConverterError::encode_failed("exit 1", None))
        .await;

    let outcome = harness.runner.run(&harness.event(&[first])).await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
    assert_eq!(outcome.converted, 1);
    assert_eq!(outcome.failed, 1);
    assert!(harness
        .lidarr
        .operations()
        .await
        .contains(&"import_tracks"));
}

#[tokio::test]
async fn test_dry_run_makes_no_remote_changes() {
    let harness = TestHarness::with_config(fixtures::config_with(
        "[source]\ndelete_original_file = true\n\n[convert]\ndry_run = true\n",
    ));
    let track = harness.add_track("01.flac");

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
    assert_eq!(outcome.import_job, None);
    let calls = harness.lidarr.calls().await;
    assert!(calls.iter().all(|c| !c.is_mutation()));
}

#[tokio::test]
async fn test_delete_original_removes_track_records() {
    let harness = TestHarness::with_config(fixtures::config_with(
        "[source]\ndelete_original_file = true\n",
    ));
    let first = harness.add_track("01.flac");
    let second = harness.add_track("02.flac");
    harness
        .lidarr
        .set_track_files(vec![fixtures::track_file(11, &first)])
        .await;

    let outcome = harness
        .runner
        .run(&harness.event(&[first.clone(), second]))
        .await;

    assert_eq!(outcome.exit_code, ExitCode::Success);
    let deletes: Vec<_> = harness
        .lidarr
        .calls()
        .await
        .into_iter()
        .filter(|c| c.operation() == "delete_track")
        .collect();
    assert_eq!(
        deletes,
        vec![LidarrCall::DeleteTrack {
            track_id: 11,
            path: first,
        }]
    );
}

#[tokio::test]
async fn test_import_error_surfaces_api_code() {
    let harness = TestHarness::new();
    let track = harness.add_track("01.flac");
    harness
        .lidarr
        .fail_on(
            "import_tracks",
            LidarrError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        )
        .await;

    let outcome = harness.runner.run(&harness.event(&[track])).await;

    assert_eq!(outcome.exit_code, ExitCode::LidarrApi);
    assert_eq!(outcome.converted, 1);
    assert!(!harness.lidarr.operations().await.contains(&"check_job"));
}
