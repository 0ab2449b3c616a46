//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::config::ConverterConfig;
use super::cover_art::{embed_cover_art, find_cover_art};
use super::error::ConverterError;
use super::traits::Transcoder;
use super::types::{MediaInfo, TranscodeJob, TranscodeOutcome};

/// FFmpeg-based transcoder implementation.
pub struct FfmpegTranscoder {
    config: ConverterConfig,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Builds ffmpeg arguments for one file.
    fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            // Keep embedded art streams as-is
            "-c:v".to_string(),
            "copy".to_string(),
            "-vsync".to_string(),
            "2".to_string(),
            "-c:a".to_string(),
            self.config.encoder.clone(),
            "-ar".to_string(),
            self.config.sample_rate_hz.to_string(),
            "-b:a".to_string(),
            format!("{}k", self.config.bitrate_kbps),
            "-metadata".to_string(),
            format!("comment={}", self.config.metadata_comment),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            output_path.to_string_lossy().to_string(),
        ]
    }

    /// Parses ffprobe JSON output into MediaInfo.
    fn parse_media_info(path: &Path, output: &str) -> Result<MediaInfo, ConverterError> {
        #[derive(Deserialize)]
        struct FfprobeOutput {
            format: FfprobeFormat,
            #[serde(default)]
            streams: Vec<FfprobeStream>,
        }

        #[derive(Deserialize)]
        struct FfprobeFormat {
            format_name: String,
            duration: Option<String>,
        }

        #[derive(Deserialize)]
        struct FfprobeStream {
            codec_type: String,
            codec_name: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u8>,
        }

        let parsed: FfprobeOutput = serde_json::from_str(output).map_err(|e| {
            ConverterError::probe_failed(format!("Failed to parse ffprobe output: {}", e))
        })?;

        let audio_stream = parsed
            .streams
            .iter()
            .find(|s| s.codec_type == "audio")
            .ok_or_else(|| ConverterError::probe_failed("no audio stream"))?;

        let format_name = parsed
            .format
            .format_name
            .split(',')
            .next()
            .unwrap_or("unknown");

        Ok(MediaInfo {
            path: path.to_path_buf(),
            format: format_name.to_string(),
            duration_secs: parsed
                .format
                .duration
                .as_ref()
                .and_then(|d| d.parse::<f64>().ok())
                .unwrap_or(0.0),
            audio_codec: audio_stream.codec_name.clone(),
            audio_sample_rate: audio_stream
                .sample_rate
                .as_ref()
                .and_then(|r| r.parse::<u32>().ok()),
            audio_channels: audio_stream.channels,
            has_video_stream: parsed.streams.iter().any(|s| s.codec_type == "video"),
        })
    }

    /// Reads stream and format details of a media file with ffprobe.
    async fn media_info(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe exited with code {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_media_info(path, &stdout)
    }

    /// Runs ffmpeg and verifies the output.
    async fn run_encoder(&self, job: &TranscodeJob) -> Result<(), ConverterError> {
        let start = Instant::now();

        if let Some(parent) = job.output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ConverterError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;
        }

        let info = self.media_info(&job.source).await?;
        debug!(
            source = %job.source.display(),
            format = %info.format,
            codec = ?info.audio_codec,
            duration_secs = info.duration_secs,
            embedded_art = info.has_video_stream,
            "Read source media info"
        );

        let args = self.build_args(&job.source, &job.output);
        debug!(command = ?args, "Running ffmpeg");

        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result?,
            // Dropping the child kills it
            Err(_) => {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::encode_failed(
                format!("FFmpeg exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        match tokio::fs::metadata(&job.output).await {
            Ok(meta) if meta.len() > 0 => {
                debug!(
                    output = %job.output.display(),
                    size_bytes = meta.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Encoded"
                );
                Ok(())
            }
            _ => Err(ConverterError::OutputMissing {
                path: job.output.clone(),
            }),
        }
    }

    /// Finds and embeds cover art. Failures are logged, not returned.
    async fn attach_cover_art(&self, job: &TranscodeJob) -> Option<PathBuf> {
        let image = find_cover_art(&job.output, &job.source)?;
        let output = job.output.clone();
        let image_for_task = image.clone();

        let result =
            tokio::task::spawn_blocking(move || embed_cover_art(&output, &image_for_task)).await;

        match result {
            Ok(Ok(())) => {
                debug!(image = %image.display(), "Embedded cover art");
                Some(image)
            }
            Ok(Err(e)) => {
                warn!(output = %job.output.display(), error = %e, "Cover art not embedded");
                None
            }
            Err(e) => {
                warn!(output = %job.output.display(), error = %e, "Cover art task failed");
                None
            }
        }
    }

    /// Truncates or deletes the source as configured.
    async fn dispose_source(&self, job: &TranscodeJob) -> Result<(), ConverterError> {
        if self.config.empty_original {
            debug!(source = %job.source.display(), "Emptying original file");
            tokio::fs::File::create(&job.source)
                .await
                .map_err(|e| ConverterError::disposal(job.source.clone(), e))?;
        }

        if self.config.delete_original {
            debug!(source = %job.source.display(), "Deleting original file");
            match tokio::fs::remove_file(&job.source).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ConverterError::disposal(job.source.clone(), e)),
            }
        }

        Ok(())
    }
}

/// Runs `path -version`. A binary that is absent or exits non-zero is reported
/// through `unusable`.
async fn check_binary(
    path: &Path,
    unusable: fn(PathBuf) -> ConverterError,
) -> Result<(), ConverterError> {
    match Command::new(path).arg("-version").output().await {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            warn!(
                path = %path.display(),
                code = ?output.status.code(),
                "Version check exited with an error"
            );
            Err(unusable(path.to_path_buf()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(unusable(path.to_path_buf())),
        Err(e) => Err(ConverterError::Io(e)),
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        check_binary(&self.config.ffmpeg_path, |path| {
            ConverterError::FfmpegNotFound { path }
        })
        .await?;
        check_binary(&self.config.ffprobe_path, |path| {
            ConverterError::FfprobeNotFound { path }
        })
        .await
    }

    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeOutcome, ConverterError> {
        let meta = tokio::fs::metadata(&job.source)
            .await
            .map_err(|_| ConverterError::InputNotFound {
                path: job.source.clone(),
            })?;

        if meta.len() == 0 {
            info!(source = %job.source.display(), "Skipping empty source file");
            return Ok(TranscodeOutcome::SkippedEmpty);
        }

        if job.source == job.output {
            return Err(ConverterError::SameFile {
                path: job.source.clone(),
            });
        }

        if self.config.dry_run {
            info!(
                source = %job.source.display(),
                output = %job.output.display(),
                command = ?self.build_args(&job.source, &job.output),
                "Dry run, not converting file"
            );
            return Ok(TranscodeOutcome::Planned {
                output: job.output.clone(),
            });
        }

        let outcome = if tokio::fs::try_exists(&job.output).await.unwrap_or(false) {
            warn!(output = %job.output.display(), "Output already exists, using existing file");
            TranscodeOutcome::Reused {
                output: job.output.clone(),
            }
        } else {
            self.run_encoder(job).await?;
            let cover_art = self.attach_cover_art(job).await;
            TranscodeOutcome::Converted {
                output: job.output.clone(),
                cover_art,
            }
        };

        self.dispose_source(job).await?;

        Ok(outcome)
    }
}
