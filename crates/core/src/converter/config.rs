//! Configuration for the converter module.

use std::path::PathBuf;

use crate::config::Config;

/// Sample rate every output is resampled to.
pub const OUTPUT_SAMPLE_RATE_HZ: u32 = 44_100;

/// Settings for the FFmpeg-based transcoder.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    pub ffmpeg_path: PathBuf,
    /// Path to ffprobe binary.
    pub ffprobe_path: PathBuf,
    /// Audio encoder passed to `-c:a`.
    pub encoder: String,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
    /// Value of the `comment` metadata tag.
    pub metadata_comment: String,
    /// FFmpeg log level.
    pub ffmpeg_log_level: String,
    /// Timeout for a single encode in seconds.
    pub timeout_secs: u64,
    /// Output file extension, without dot.
    pub target_extension: String,
    /// Destination root; `None` writes beside the source.
    pub destination_root: Option<PathBuf>,
    pub dry_run: bool,
    pub delete_original: bool,
    pub empty_original: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            encoder: "aac".to_string(),
            bitrate_kbps: 128,
            sample_rate_hz: OUTPUT_SAMPLE_RATE_HZ,
            metadata_comment: "Converted by flacarr".to_string(),
            ffmpeg_log_level: "error".to_string(),
            timeout_secs: 3600,
            target_extension: "mp4".to_string(),
            destination_root: None,
            dry_run: false,
            delete_original: false,
            empty_original: false,
        }
    }
}

impl From<&Config> for ConverterConfig {
    fn from(config: &Config) -> Self {
        Self {
            ffmpeg_path: config.convert.ffmpeg_path.clone(),
            ffprobe_path: config.convert.ffprobe_path.clone(),
            encoder: config.convert.encoder.clone(),
            bitrate_kbps: config.convert.bitrate,
            sample_rate_hz: OUTPUT_SAMPLE_RATE_HZ,
            metadata_comment: config.convert.metadata_comment.clone(),
            ffmpeg_log_level: config.convert.ffmpeg_log_level.clone(),
            timeout_secs: config.convert.timeout_secs,
            target_extension: config.target.extension().to_string(),
            destination_root: config.target.folder.clone(),
            dry_run: config.convert.dry_run,
            delete_original: config.source.delete_original_file,
            empty_original: config.source.empty_original_file,
        }
    }
}

impl ConverterConfig {
    /// Creates a config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }

    /// Sets the destination root.
    pub fn with_destination(mut self, root: PathBuf) -> Self {
        self.destination_root = Some(root);
        self
    }

    /// Enables or disables dry run.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
