//! Log routing for the terminal client.
//!
//! Rendered views own stdout, so console logs go to stderr. Every run also appends to a log
//! file: `DOCUMIND_LOG_FILE` when configured, `logs/documind.log` otherwise.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_NAME: &str = "documind.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(log_file: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let file_layer = open_log_file(log_file).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

/// Directory and file name the file layer appends to.
fn log_target(log_file: Option<&str>) -> (PathBuf, PathBuf) {
    let Some(path) = log_file.map(Path::new) else {
        return (DEFAULT_LOG_DIR.into(), DEFAULT_LOG_NAME.into());
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| DEFAULT_LOG_NAME.into());
    (dir.to_path_buf(), name)
}

fn open_log_file(log_file: Option<&str>) -> Option<NonBlocking> {
    let (dir, name) = log_target(log_file);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {err}", dir.display());
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(&dir)
    {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", dir.join(&name).display());
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}
