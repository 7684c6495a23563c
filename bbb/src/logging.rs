//! Tracing setup. The terminal belongs to the TUI, so logs go to a file:
//! `$XDG_STATE_HOME/bbb/bbb.log` (or `~/.local/state/bbb/bbb.log`), filtered
//! by the `BBB_LOG` environment variable (default `warn`).

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::xdg_dir;

pub fn log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("bbb").join("bbb.log")
}

/// Installs the global subscriber writing to [`log_path`].
///
/// # Errors
///
/// Fails when the log directory or file cannot be created, or a subscriber
/// is already installed.
pub fn init() -> anyhow::Result<PathBuf> {
    let path = log_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::try_from_env("BBB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(path)
}
