//! File-based tracing setup.
//!
//! The terminal belongs to the UI, so log events go to a file instead.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

pub fn default_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("reminder-assistant").join("reminder-assistant.log"))
}

/// Install the global subscriber. `RUST_LOG` wins over `level`.
///
/// A second call leaves the first subscriber in place.
pub fn init(path: &Path, level: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}
