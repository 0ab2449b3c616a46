pub mod config;
pub mod converter;
pub mod discovery;
pub mod event;
pub mod exit;
pub mod lidarr;
pub mod orchestrator;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ImportMethod,
    SanitizedConfig,
};
pub use converter::{ConverterConfig, ConverterError, FfmpegTranscoder, Transcoder};
pub use event::{EventError, EventType, LidarrEvent};
pub use exit::ExitCode;
pub use lidarr::{JobOutcome, LidarrApi, LidarrClient, LidarrError};
pub use orchestrator::{HookRunner, RunOutcome};
