mod cli;
mod logging;

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, error, info, warn};

use flacarr_core::{
    load_config, validate_config, ConverterConfig, EventError, EventType, ExitCode,
    FfmpegTranscoder, HookRunner, LidarrClient, LidarrEvent, SanitizedConfig,
};

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success,
                _ => ExitCode::BadArguments,
            }
            .into();
        }
    };

    run(cli).await.into()
}

/// Exit code for events that end before any configuration is read.
///
/// `None` means the event needs the full run.
fn early_exit(event: &Result<LidarrEvent, EventError>) -> Option<ExitCode> {
    match event {
        Err(e) => Some(e.exit_code()),
        Ok(event) => match &event.event_type {
            EventType::Test => Some(ExitCode::Success),
            EventType::AlbumDownload => None,
            EventType::Other(_) => Some(ExitCode::UnknownEvent),
        },
    }
}

async fn run(cli: Cli) -> ExitCode {
    let event = LidarrEvent::from_env();
    if let Some(code) = early_exit(&event) {
        let _ = logging::init("info", None);
        match &event {
            Ok(event) if event.event_type == EventType::Test => {
                info!("Lidarr test event received, nothing to do")
            }
            Ok(event) => {
                warn!(event_type = event.event_type.as_str(), "Unhandled Lidarr event type")
            }
            Err(e) => error!(error = %e, "Not invoked correctly"),
        }
        return code;
    }
    let event = match event {
        Ok(event) => event,
        Err(e) => return e.exit_code(),
    };

    let config = match load_config(&cli.config).and_then(|c| validate_config(&c).map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from the file, so fall back to stderr defaults
            let _ = logging::init("info", None);
            error!(path = ?cli.config, error = %e, "Invalid configuration");
            return e.exit_code();
        }
    };

    if let Err(e) = logging::init(&config.logging.level, config.logging.file.as_deref()) {
        eprintln!("flacarr: {:#}", e);
        return ExitCode::LogNotWritable;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "flacarr starting");
    debug!(
        config = %serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default(),
        "Configuration loaded"
    );

    let lidarr = match LidarrClient::new(&config.lidarr) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to create Lidarr client");
            return e.exit_code();
        }
    };
    let transcoder = Arc::new(FfmpegTranscoder::new(ConverterConfig::from(&config)));

    let runner = HookRunner::new(config, transcoder, lidarr);
    let outcome = runner.run(&event).await;

    info!(
        event_type = event.event_type.as_str(),
        exit_code = %outcome.exit_code,
        converted = outcome.converted,
        failed = outcome.failed,
        "flacarr finished"
    );

    outcome.exit_code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_exit() {
        let test =
            LidarrEvent::from_vars([("lidarr_eventtype", "Test"), ("lidarr_artist_id", "abc")]);
        assert_eq!(early_exit(&test), Some(ExitCode::Success));

        let grab = LidarrEvent::from_vars([("lidarr_eventtype", "Grab")]);
        assert_eq!(early_exit(&grab), Some(ExitCode::UnknownEvent));

        let missing = LidarrEvent::from_vars([("lidarr_album_id", "2")]);
        assert_eq!(early_exit(&missing), Some(ExitCode::UnknownEvent));

        let album = LidarrEvent::from_vars([("lidarr_eventtype", "AlbumDownload")]);
        assert_eq!(early_exit(&album), None);
    }
}
