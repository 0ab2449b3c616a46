use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Rotated log files kept beside the current one.
const MAX_LOG_FILES: usize = 5;

/// Install the global subscriber: stderr always, plus a rotating log file when
/// `file` is given.
///
/// `RUST_LOG` wins over `level`. Fails when the log file cannot be created.
pub fn init(level: &str, file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender(path)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;

    Ok(())
}

/// Daily-rotated appender for `path`.
///
/// `/var/log/flacarr.log` becomes `/var/log/flacarr.<date>.log`, keeping at most
/// [`MAX_LOG_FILES`] files.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "flacarr".to_string());

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(MAX_LOG_FILES);
    if let Some(extension) = path.extension() {
        builder = builder.filename_suffix(extension.to_string_lossy().to_string());
    }

    builder
        .build(directory)
        .with_context(|| format!("Cannot write log file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_unwritable_log_file() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("blocker");
        std::fs::write(&not_a_dir, b"").unwrap();

        let err = file_appender(&not_a_dir.join("flacarr.log")).unwrap_err();
        assert!(err.to_string().contains("Cannot write log file"));

        let err = init("info", Some(&not_a_dir.join("flacarr.log"))).unwrap_err();
        assert!(err.to_string().contains("Cannot write log file"));
    }

    #[test]
    fn test_log_file_name_keeps_stem_and_extension() {
        let dir = TempDir::new().unwrap();
        let mut appender = file_appender(&dir.path().join("logs").join("flacarr.log")).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path().join("logs"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("flacarr."));
        assert!(names[0].ends_with(".log"));
    }
}
