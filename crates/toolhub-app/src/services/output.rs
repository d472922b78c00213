// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output paths and writes.
//
// When no `--output` is given, the result is named after the input with a
// suffix (`report.pdf` -> `report-extracted.pdf`) and written to the
// configured output directory, or next to the input.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use toolhub_core::AppConfig;
use toolhub_core::error::Result;

/// Where derived output files go.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    output_dir: Option<PathBuf>,
}

impl OutputPlan {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
        }
    }

    /// `explicit` when given, otherwise `<stem>-<suffix>.<extension>`.
    pub fn resolve(
        &self,
        explicit: Option<&Path>,
        input: &Path,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self.derive(input, suffix, extension),
        }
    }

    pub fn derive(&self, input: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("output");
        let name = if suffix.is_empty() {
            format!("{stem}.{extension}")
        } else {
            format!("{stem}-{suffix}.{extension}")
        };
        self.directory_for(input).join(name)
    }

    /// Directory for a family of numbered outputs (split parts).
    pub fn directory_for(&self, input: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Write `bytes` to `path`, creating parent directories, and log it.
/// A path of `-` writes to stdout.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}
