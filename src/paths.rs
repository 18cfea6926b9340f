use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::config;

/// Resolve the user's home directory ($HOME, or %USERPROFILE% on Windows).
pub fn home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(v) = std::env::var("HOME") {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    // Windows fallback
    if let Ok(v) = std::env::var("USERPROFILE") {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    bail!("Cannot determine home directory (neither HOME nor USERPROFILE is set)")
}

/// Default data directory (~/.things/), created if missing.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let dir = home_dir()?.join(config::DATA_DIR_REL);
    ensure_dir(&dir)?;
    Ok(dir)
}

pub fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed creating dir {}", dir.display()))
}
