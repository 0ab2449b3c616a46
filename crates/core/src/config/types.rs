use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    pub lidarr: LidarrConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where lossless sources come from and what happens to them afterwards
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Library root. Outputs under `target.folder` mirror paths relative to it.
    #[serde(default)]
    pub folder: Option<PathBuf>,
    /// Extensions to convert, with or without a leading dot (case-insensitive).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Remove the source after a successful conversion.
    #[serde(default)]
    pub delete_original_file: bool,
    /// Truncate the source to zero bytes after a successful conversion.
    #[serde(default)]
    pub empty_original_file: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            folder: None,
            extensions: default_extensions(),
            delete_original_file: false,
            empty_original_file: false,
        }
    }
}

impl SourceConfig {
    /// Extensions lowercased and stripped of any leading dot.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }
}

fn default_extensions() -> Vec<String> {
    vec!["flac".to_string(), "wav".to_string()]
}

/// Output container and location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Output file extension (container), without dot.
    #[serde(default = "default_format")]
    pub format: String,
    /// Destination root. Outputs are written beside their sources when unset.
    #[serde(default)]
    pub folder: Option<PathBuf>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            folder: None,
        }
    }
}

impl TargetConfig {
    pub fn extension(&self) -> &str {
        self.format.trim().trim_start_matches('.')
    }
}

fn default_format() -> String {
    "mp4".to_string()
}

/// Encoder settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// ffmpeg audio encoder name (e.g. "aac", "libfdk_aac").
    #[serde(default = "default_encoder")]
    pub encoder: String,
    /// Audio bitrate in kbps.
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,
    /// Written to the output's `comment` tag.
    #[serde(default = "default_comment")]
    pub metadata_comment: String,
    /// Log what would be done without encoding or touching Lidarr.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_ffmpeg_log_level")]
    pub ffmpeg_log_level: String,
    /// Timeout for a single encode in seconds.
    #[serde(default = "default_encode_timeout")]
    pub timeout_secs: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            encoder: default_encoder(),
            bitrate: default_bitrate(),
            metadata_comment: default_comment(),
            dry_run: false,
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            ffmpeg_log_level: default_ffmpeg_log_level(),
            timeout_secs: default_encode_timeout(),
        }
    }
}

fn default_encoder() -> String {
    "aac".to_string()
}

fn default_bitrate() -> u32 {
    128
}

fn default_comment() -> String {
    "Converted by flacarr".to_string()
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_ffmpeg_log_level() -> String {
    "error".to_string()
}

fn default_encode_timeout() -> u64 {
    3600 // 1 hour
}

/// Lidarr connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LidarrConfig {
    /// Lidarr base URL including scheme (e.g., "http://localhost")
    pub url: String,
    #[serde(default = "default_lidarr_port")]
    pub port: u16,
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// How converted files are handed back to Lidarr.
    #[serde(default)]
    pub import_method: ImportMethod,
    /// Command status polls before giving up (default: 15)
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    /// Delay between command status polls (default: 1000)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl LidarrConfig {
    /// API root, e.g. `http://localhost:8686/api/v1`.
    pub fn api_base(&self) -> String {
        format!("{}:{}/api/v1", self.url.trim_end_matches('/'), self.port)
    }
}

fn default_lidarr_port() -> u16 {
    8686
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_attempts() -> u32 {
    15
}

fn default_poll_interval() -> u64 {
    1000
}

/// Import command used after conversion
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportMethod {
    /// `DownloadedAlbumsScan` over the folder holding the new files.
    #[default]
    Scan,
    /// `ManualImport` of the matching manual-import candidates.
    Manual,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append logs to this file in addition to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub convert: ConvertConfig,
    pub lidarr: SanitizedLidarrConfig,
    pub logging: LoggingConfig,
}

/// Sanitized Lidarr config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLidarrConfig {
    pub api_base: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub import_method: ImportMethod,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            target: config.target.clone(),
            convert: config.convert.clone(),
            lidarr: SanitizedLidarrConfig {
                api_base: config.lidarr.api_base(),
                api_key_configured: !config.lidarr.api_key.is_empty(),
                timeout_secs: config.lidarr.timeout_secs,
                import_method: config.lidarr.import_method,
                poll_attempts: config.lidarr.poll_attempts,
                poll_interval_ms: config.lidarr.poll_interval_ms,
            },
            logging: config.logging.clone(),
        }
    }
}
