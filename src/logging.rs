//! File logging
//!
//! The terminal belongs to the TUI, so tracing output goes to
//! `~/.refactor-tui/refactor-tui.log`. `RUST_LOG` overrides the default filter.

use crate::config::Config;
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "refactor-tui.log";
const DEFAULT_FILTER: &str = "refactor_tui=info";

pub fn log_path() -> Option<PathBuf> {
    Config::config_dir().map(|dir| dir.join(LOG_FILE_NAME))
}

/// Install the global subscriber. Without a home directory, logging is off.
pub fn init_logging() -> Result<()> {
    let Some(path) = log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not initialise logging: {}", e))?;

    Ok(())
}
