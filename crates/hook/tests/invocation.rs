//! Binary invocation tests.
//!
//! Runs the `flacarr` binary with a clean environment, the way Lidarr would, and
//! checks the exit status for events that end before any work is done.

use std::path::Path;

use tempfile::TempDir;
use tokio::process::Command;

/// Run the hook in `dir` with only the given variables set.
async fn run_hook(dir: &Path, vars: &[(&str, &str)]) -> i32 {
    let status = Command::new(env!("CARGO_BIN_EXE_flacarr"))
        .env_clear()
        .envs(vars.iter().copied())
        .current_dir(dir)
        .kill_on_drop(true)
        .status()
        .await
        .expect("Failed to run flacarr");
    status.code().expect("flacarr was killed by a signal")
}

#[tokio::test]
async fn test_missing_event_type_without_config() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_hook(dir.path(), &[]).await, 7);
}

#[tokio::test]
async fn test_test_event_without_config() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_hook(dir.path(), &[("lidarr_eventtype", "Test")]).await, 0);
}

#[tokio::test]
async fn test_test_event_ignores_malformed_ids() {
    let dir = TempDir::new().unwrap();
    let code = run_hook(
        dir.path(),
        &[("lidarr_eventtype", "Test"), ("lidarr_artist_id", "abc")],
    )
    .await;
    assert_eq!(code, 0);
}

#[tokio::test]
async fn test_test_event_has_no_side_effects() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[lidarr]\nurl = \"http://127.0.0.1\"\napi_key = \"k\"\n\n[logging]\nfile = \"hook.log\"\n",
    )
    .unwrap();

    assert_eq!(run_hook(dir.path(), &[("lidarr_eventtype", "Test")]).await, 0);
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "only config.toml should exist");
}

#[tokio::test]
async fn test_unknown_event_without_config() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_hook(dir.path(), &[("lidarr_eventtype", "Grab")]).await, 7);
}

#[tokio::test]
async fn test_album_download_needs_config() {
    let dir = TempDir::new().unwrap();
    let code = run_hook(dir.path(), &[("lidarr_eventtype", "AlbumDownload")]).await;
    assert_eq!(code, 20);
}

#[tokio::test]
async fn test_bad_arguments() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_flacarr"))
        .arg("--bitrate")
        .env_clear()
        .current_dir(dir.path())
        .status()
        .await
        .unwrap();
    assert_eq!(status.code(), Some(3));
}
