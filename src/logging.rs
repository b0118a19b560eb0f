use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use time::macros::format_description;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*};

/// Session logs older than this are removed when a file logger starts.
pub const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const SESSION_PREFIX: &str = "session-";

/// Get the log directory path in the user-specific OS cache directory
/// - Linux: ~/.cache/semantic-query-ir/
/// - macOS: ~/Library/Caches/semantic-query-ir/
/// - Windows: %LOCALAPPDATA%\semantic-query-ir\
pub fn default_log_dir() -> io::Result<PathBuf> {
    let cache_dir = dirs::cache_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Unable to determine user cache directory")
    })?;
    Ok(cache_dir.join("semantic-query-ir"))
}

/// Removes `session-*.log` files in `log_dir` last modified more than
/// `retention` ago. Returns how many files were removed.
pub fn cleanup_old_logs(log_dir: &Path, retention: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)?.flatten() {
        let Ok(metadata) = entry.metadata() else { continue };
        if !metadata.is_file() {
            continue;
        }
        let is_session_log = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(SESSION_PREFIX) && name.ends_with(".log"));
        if !is_session_log {
            continue;
        }
        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > retention);
        if expired {
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!("Failed to remove old log file {:?}: {}", entry.path(), e),
            }
        }
    }

    Ok(removed)
}

fn session_log_name() -> io::Result<String> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))
        .map_err(io::Error::other)?;
    Ok(format!("{}{}-{}.log", SESSION_PREFIX, timestamp, std::process::id()))
}

/// Returns true for the error `try_init` reports when a global subscriber is
/// already installed, e.g. by another test in the same process.
fn already_initialized(e: &dyn std::error::Error) -> bool {
    let message = e.to_string();
    message.contains("already been set") || message.contains("SetLoggerError")
}

/// Initialize logging to stderr and, when `log_dir` is given, to a session file.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
/// * `log_dir` - Directory for the DEBUG-level session log; created if missing
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for as long as file logging is wanted. Calling this when a global
/// subscriber already exists is not an error; the existing one stays active.
pub fn init_logger(
    no_color: bool,
    log_level: Option<&str>,
    log_dir: Option<&Path>,
) -> io::Result<Option<WorkerGuard>> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"),
    );

    let stderr_filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    let Some(log_dir) = log_dir else {
        return match tracing_subscriber::registry().with(stderr_layer).try_init() {
            Ok(()) => Ok(None),
            Err(e) if already_initialized(&e) => Ok(None),
            Err(e) => Err(io::Error::other(e)),
        };
    };

    fs::create_dir_all(log_dir)?;
    cleanup_old_logs(log_dir, LOG_RETENTION)?;

    let log_path = log_dir.join(session_log_name()?);
    let file = fs::OpenOptions::new().create(true).append(true).open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(timer)
        .with_ansi(false)
        .with_filter(tracing_subscriber::EnvFilter::new("debug"));

    match tracing_subscriber::registry().with(stderr_layer).with(file_layer).try_init() {
        Ok(()) => {
            eprintln!("Logging to file: {:?}", log_path);
            Ok(Some(guard))
        }
        Err(e) if already_initialized(&e) => Ok(Some(guard)),
        Err(e) => Err(io::Error::other(e)),
    }
}
