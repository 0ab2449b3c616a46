//! Mock transcoder for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{ConverterError, TranscodeJob, TranscodeOutcome, Transcoder};

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track transcode jobs for assertions
/// - Fail selected files by name
/// - Fail validation
///
/// Never touches the filesystem.
///
/// # Example
///
/// ```rust,ignore
/// let transcoder = MockTranscoder::new();
/// transcoder.fail_on("02.flac", ConverterError::probe_failed("bad header")).await;
///
/// let report = convert_all(&transcoder, &files, root, &config).await;
/// assert_eq!(transcoder.job_count().await, files.len());
/// ```
#[derive(Debug, Default)]
pub struct MockTranscoder {
    /// Recorded jobs, in call order.
    jobs: Arc<RwLock<Vec<TranscodeJob>>>,
    /// Errors to return, keyed by source file name. Each fires once.
    failures: Arc<RwLock<HashMap<String, ConverterError>>>,
    /// If set, `validate` fails with this error.
    validate_error: Arc<RwLock<Option<ConverterError>>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded jobs.
    pub async fn jobs(&self) -> Vec<TranscodeJob> {
        self.jobs.read().await.clone()
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Fail the transcode of the file named `file_name`.
    pub async fn fail_on(&self, file_name: impl Into<String>, error: ConverterError) {
        self.failures.write().await.insert(file_name.into(), error);
    }

    /// Make `validate` fail.
    pub async fn set_validate_error(&self, error: ConverterError) {
        *self.validate_error.write().await = Some(error);
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        match self.validate_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeOutcome, ConverterError> {
        self.jobs.write().await.push(job.clone());

        let file_name = job
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(err) = self.failures.write().await.remove(&file_name) {
            return Err(err);
        }

        Ok(TranscodeOutcome::Converted {
            output: job.output.clone(),
            cover_art: None,
        })
    }
}
