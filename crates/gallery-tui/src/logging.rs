use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log directory: `~/.cache/artic-gallery/logs/`, created on demand.
pub fn log_dir() -> Option<PathBuf> {
    logs_under(&dirs::cache_dir()?)
}

fn logs_under(cache: &Path) -> Option<PathBuf> {
    let dir = cache.join("artic-gallery").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Send tracing output to a daily log file. The terminal belongs to the UI,
/// so nothing is logged to stdout or stderr.
///
/// The filter comes from `GALLERY_LOG`, then `RUST_LOG`, then `info`.
/// Returns the guard that flushes the file writer; keep it alive until exit.
pub fn init_logging() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    let appender = tracing_appender::rolling::daily(dir, "gallery-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("GALLERY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .ok()?;
    Some(guard)
}
