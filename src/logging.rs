// Logging setup. `RUST_LOG` wins over the `--log-level` flag.
//
// The interactive screen owns the terminal, so it logs to a file; the
// headless upload logs to stderr and keeps stdout for its output.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// `<data dir>/rabbithole/rabbithole.log`, falling back to the temp dir.
pub fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("rabbithole")
        .join("rabbithole.log")
}

/// Filter used when `RUST_LOG` is not set: our crates at `level`,
/// everything else at warn.
pub fn default_filter(level: &str) -> String {
    format!("warn,rabbithole_cli={level},rabbithole={level}")
}

pub fn init(level: &str, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}
