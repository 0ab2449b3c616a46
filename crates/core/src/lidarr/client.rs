//! Lidarr REST client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::{ImportMethod, LidarrConfig};

use super::poll::{PollResult, RetryPolicy};
use super::types::{
    CommandRequest, CommandResource, JobOutcome, JobStatus, LidarrApi, LidarrError,
    ManualImportItem, TrackDeletion, TrackFile,
};

/// Lidarr API v1 client.
pub struct LidarrClient {
    client: Client,
    base_url: String,
    api_key: String,
    import_method: ImportMethod,
    poll: RetryPolicy<JobStatus>,
}

impl LidarrClient {
    /// Create a new Lidarr client.
    pub fn new(config: &LidarrConfig) -> Result<Self, LidarrError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LidarrError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base(),
            api_key: config.api_key.clone(),
            import_method: config.import_method,
            poll: RetryPolicy::new(
                config.poll_attempts,
                Duration::from_millis(config.poll_interval_ms),
                JobStatus::stops_polling,
            ),
        })
    }

    /// Replace the command poll policy.
    pub fn with_poll_policy(mut self, poll: RetryPolicy<JobStatus>) -> Self {
        self.poll = poll;
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Attach auth and send.
    async fn send(&self, request: RequestBuilder) -> Result<Response, LidarrError> {
        request
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LidarrError::Timeout
                } else if e.is_connect() {
                    LidarrError::Connection(e.to_string())
                } else {
                    LidarrError::InvalidResponse(e.to_string())
                }
            })
    }

    /// Turn a non-success response into `LidarrError::Api`, preferring the
    /// body's `message` field.
    async fn check_status(response: Response) -> Result<Response, LidarrError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        Err(LidarrError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, LidarrError> {
        let url = self.url(endpoint);
        debug!(url = %url, "GET");
        let response = self.send(self.client.get(&url)).await?;
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| LidarrError::InvalidResponse(format!("{}: {}", endpoint, e)))
    }

    async fn post_command(&self, command: &CommandRequest) -> Result<CommandResource, LidarrError> {
        let url = self.url("/command");
        debug!(url = %url, command = command.name(), "POST");
        let response = self.send(self.client.post(&url).json(command)).await?;
        let response = Self::check_status(response).await?;
        response
            .json::<CommandResource>()
            .await
            .map_err(|e| LidarrError::InvalidResponse(format!("/command: {}", e)))
    }

    async fn job_status(&self, job_id: i64) -> Result<JobStatus, LidarrError> {
        let command: CommandResource = self.get_json(&format!("/command/{}", job_id)).await?;
        // No status yet counts as still running
        let status = JobStatus::parse(command.status.as_deref().unwrap_or_default());
        debug!(job_id, status = status.as_str(), "Job status");
        Ok(status)
    }
}

#[async_trait]
impl LidarrApi for LidarrClient {
    async fn get_version(&self) -> Result<String, LidarrError> {
        #[derive(Deserialize)]
        struct SystemStatus {
            version: Option<String>,
        }

        let status: SystemStatus = self.get_json("/system/status").await?;
        let version = status
            .version
            .ok_or_else(|| LidarrError::InvalidResponse("no version in /system/status".into()))?;
        info!(version = %version, "Connected to Lidarr");
        Ok(version)
    }

    async fn get_trackfile_info(
        &self,
        artist_id: i64,
        album_id: i64,
    ) -> Result<Vec<TrackFile>, LidarrError> {
        let files: Vec<TrackFile> = self
            .get_json(&format!(
                "/trackFile?artistId={}&albumId={}",
                artist_id, album_id
            ))
            .await?;
        debug!(artist_id, album_id, count = files.len(), "Fetched track files");
        Ok(files)
    }

    async fn delete_track(
        &self,
        track_id: i64,
        file_path: &Path,
    ) -> Result<TrackDeletion, LidarrError> {
        let url = self.url(&format!("/trackFile/{}", track_id));
        debug!(url = %url, "DELETE");
        let response = self.send(self.client.delete(&url)).await?;

        if response.status().is_success() {
            info!(track_id, path = %file_path.display(), "Deleted track file in Lidarr");
            return Ok(TrackDeletion::Remote);
        }

        warn!(
            track_id,
            status = response.status().as_u16(),
            path = %file_path.display(),
            "Lidarr refused track deletion, removing local file"
        );
        match tokio::fs::remove_file(file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(LidarrError::LocalDelete {
                    path: file_path.to_path_buf(),
                    source: e,
                })
            }
        }
        Ok(TrackDeletion::LocalFallback)
    }

    async fn get_import_info(
        &self,
        artist_id: i64,
        folder: &Path,
        download_id: Option<&str>,
        album_id: i64,
    ) -> Result<Vec<ManualImportItem>, LidarrError> {
        if let Err(e) = self
            .post_command(&CommandRequest::RefreshAlbum { album_id })
            .await
        {
            error!(album_id, error = %e, "Album refresh failed");
        }

        let endpoint = format!(
            "/manualimport?folder={}&artistId={}&downloadId={}&filterExistingFiles=true&replaceExistingFiles=false",
            urlencoding::encode(&folder.to_string_lossy()),
            artist_id,
            urlencoding::encode(download_id.unwrap_or_default()),
        );
        let items: Vec<ManualImportItem> = self.get_json(&endpoint).await?;
        debug!(folder = %folder.display(), count = items.len(), "Fetched import candidates");
        Ok(items)
    }

    async fn import_tracks(
        &self,
        items: &[ManualImportItem],
        album_path: &Path,
    ) -> Result<i64, LidarrError> {
        let command = match self.import_method {
            ImportMethod::Scan => CommandRequest::DownloadedAlbumsScan {
                path: album_path.to_path_buf(),
            },
            ImportMethod::Manual => CommandRequest::manual_import(items),
        };

        let accepted = self.post_command(&command).await?;
        info!(
            job_id = accepted.id,
            command = command.name(),
            path = %album_path.display(),
            "Import command accepted"
        );
        Ok(accepted.id)
    }

    async fn check_job(&self, job_id: i64) -> Result<JobOutcome, LidarrError> {
        let result = self.poll.run(|_| self.job_status(job_id)).await?;

        let outcome = match result {
            PollResult::Stopped { status, attempt } => {
                debug!(job_id, attempt, "Job poll stopped");
                match status {
                    JobStatus::Completed => JobOutcome::Completed,
                    JobStatus::Failed => JobOutcome::Failed,
                    JobStatus::Queued => JobOutcome::Queued,
                    other => JobOutcome::TimedOut {
                        last_status: Some(other),
                    },
                }
            }
            PollResult::Exhausted { last } => JobOutcome::TimedOut { last_status: last },
        };

        match &outcome {
            JobOutcome::Completed => info!(job_id, "Import job completed"),
            JobOutcome::Queued => info!(job_id, "Import job queued, not waiting for it"),
            JobOutcome::Failed => error!(job_id, "Import job failed"),
            JobOutcome::TimedOut { last_status } => error!(
                job_id,
                last_status = last_status.as_ref().map(|s| s.as_str()).unwrap_or("none"),
                attempts = self.poll.max_attempts,
                "Timed out waiting for import job"
            ),
        }

        Ok(outcome)
    }
}
