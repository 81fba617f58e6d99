//! Tracing subscriber setup.
use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "tile-demo.log";

/// Default filter directive: `debug` with the debug flag, `warn` otherwise.
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "warn" }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default level. With a log directory, output goes
/// to a daily-rolling file so a raw-mode terminal stays clean; the returned
/// guard must be kept alive until exit to flush it.
pub fn init(debug: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    match log_dir {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            tracing::info!(dir = %dir.display(), "logging to file");
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Daily-rolling, non-blocking writer under `dir`, created if missing.
pub fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(file_appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_selects_level() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn file_writer_creates_the_log_directory() {
        use std::io::Write;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("logs").join("nested");

        let (mut writer, guard) = file_writer(&dir).unwrap();
        writer.write_all(b"turn 1\n").unwrap();
        drop(guard);

        let files: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(files.len(), 1);
        let name = files[0].as_ref().unwrap().file_name();
        assert!(name.to_string_lossy().starts_with(LOG_FILE_PREFIX));
    }
}
