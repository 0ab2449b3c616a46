//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{TranscodeJob, TranscodeOutcome};

/// Something that turns a lossless source into the target format.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;

    /// Transcodes one file, attaches cover art and disposes of the source
    /// as configured.
    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeOutcome, ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct PassthroughTranscoder;

    #[async_trait]
    impl Transcoder for PassthroughTranscoder {
        fn name(&self) -> &str {
            "passthrough"
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }

        async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeOutcome, ConverterError> {
            Ok(TranscodeOutcome::Reused {
                output: job.output.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_trait_object_usage() {
        let transcoder: Box<dyn Transcoder> = Box::new(PassthroughTranscoder);
        assert_eq!(transcoder.name(), "passthrough");
        transcoder.validate().await.unwrap();

        let job = TranscodeJob {
            source: PathBuf::from("/in/a.flac"),
            output: PathBuf::from("/in/a.mp4"),
        };
        let outcome = transcoder.transcode(&job).await.unwrap();
        assert_eq!(
            outcome,
            TranscodeOutcome::Reused {
                output: PathBuf::from("/in/a.mp4")
            }
        );
    }
}
