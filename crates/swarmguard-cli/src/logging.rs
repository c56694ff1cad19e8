//! Console and file logging setup.
//!
//! Two sinks carry the same stream: a live console layer and a
//! daily-rotated, non-blocking file layer under the log directory. The
//! returned guard must stay alive for the lifetime of the process, or
//! buffered records are dropped on exit.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default record stream location, e.g.
/// `~/.local/share/swarmguard/logs`
#[must_use]
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "swarmguard", "swarmguard")
        .map_or_else(|| PathBuf::from("logs"), |dirs| dirs.data_dir().join("logs"))
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "swarmguard.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}
