//! File-based logging setup.
//!
//! The terminal belongs to the prompt and the wrapped child, so logs go to a
//! per-run file under `logs/` next to the executable. The level comes from
//! `RUST_LOG` (default `info`).

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize per-run file logging.
///
/// Failures are reported to stderr and otherwise ignored; the program works
/// without a log file.
pub fn init_logging() {
    let dir = log_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("warning: could not create log directory: {e}");
        return;
    }

    // One file per run, e.g. logs/replwrap.2025-08-07-14-30-25.log
    let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let path = dir.join(format!("replwrap.{stamp}.log"));
    let file = match fs::File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: could not create log file: {e}");
            return;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    // The guard must outlive every log call, so it is leaked for the
    // lifetime of the process.
    std::mem::forget(guard);

    tracing::info!("logging to {}", path.display());
}
