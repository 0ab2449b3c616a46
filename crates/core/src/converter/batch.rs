//! Output planning and sequential batch conversion.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::config::ConverterConfig;
use super::traits::Transcoder;
use super::types::{ConversionReport, TranscodeJob, TranscodeOutcome};

/// Computes the output path for `source`.
///
/// Without a destination root the output sits beside the source. With one, the
/// source's path relative to `source_root` is recreated under it; a source outside
/// `source_root` lands directly under the destination root.
pub fn plan_output(source: &Path, source_root: &Path, config: &ConverterConfig) -> PathBuf {
    let renamed = source.with_extension(&config.target_extension);

    let Some(destination) = &config.destination_root else {
        return renamed;
    };

    match renamed.strip_prefix(source_root) {
        Ok(relative) => destination.join(relative),
        Err(_) => match renamed.file_name() {
            Some(name) => destination.join(name),
            None => renamed,
        },
    }
}

/// Transcodes `files` one at a time.
///
/// A failing file is logged and recorded; the batch always runs to the end.
pub async fn convert_all(
    transcoder: &dyn Transcoder,
    files: &[PathBuf],
    source_root: &Path,
    config: &ConverterConfig,
) -> ConversionReport {
    let mut report = ConversionReport::default();

    for (index, source) in files.iter().enumerate() {
        let job = TranscodeJob {
            source: source.clone(),
            output: plan_output(source, source_root, config),
        };

        info!(
            file = index + 1,
            total = files.len(),
            source = %job.source.display(),
            output = %job.output.display(),
            "Converting"
        );

        let result = transcoder.transcode(&job).await;
        match &result {
            Ok(TranscodeOutcome::Converted { cover_art, .. }) => {
                info!(output = %job.output.display(), cover_art = cover_art.is_some(), "Converted");
            }
            Ok(_) => {}
            Err(e) => {
                error!(
                    source = %job.source.display(),
                    error = %e,
                    exit_code = e.exit_code().code(),
                    "Conversion failed"
                );
            }
        }

        report.push(job.source, result);
    }

    info!(
        succeeded = report.success_count(),
        failed = report.failure_count(),
        "Batch finished"
    );

    report
}
