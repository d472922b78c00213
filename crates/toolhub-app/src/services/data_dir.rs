// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config directory resolution and config persistence.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use toolhub_core::config::CONFIG_FILE;
use toolhub_core::{AppConfig, error::Result};

const APP_DIR: &str = "toolhub";

/// Return the application config directory. Nothing is created on disk.
pub fn config_dir() -> PathBuf {
    base_dir(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
    .join(APP_DIR)
}

/// Default location of `config.json`.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn base_dir(xdg: Option<String>, home: Option<String>) -> PathBuf {
    // Try XDG config dir, then fall back to home
    if let Some(xdg) = xdg.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}

/// Load the config at `path` (or the default location), validating it.
pub fn load_config(path: Option<&Path>) -> Result<(AppConfig, PathBuf)> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let config = AppConfig::load(&path)?;
    config.validate()?;
    debug!(path = %path.display(), "config loaded");
    Ok((config, path))
}

/// Write `config` to `path`, creating parent directories.
pub fn persist_config(path: &Path, config: &AppConfig) -> Result<()> {
    config.save(path)?;
    info!(path = %path.display(), "config written");
    Ok(())
}
