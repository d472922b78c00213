// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ToolhubError};

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent application settings.
///
/// Every field has a default so that partial config files written by older
/// versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Paper size for PDFs created from text or images.
    pub default_paper_size: crate::PaperSize,
    /// JPEG quality (1-100) used when an image tool writes JPEG.
    pub jpeg_quality: u8,
    /// Field delimiter for CSV input and output.
    pub csv_delimiter: char,
    /// Root element name for JSON/CSV to XML conversion.
    pub xml_root_element: String,
    /// Default length for generated passwords.
    pub password_length: usize,
    /// Directory for derived output files. `None` writes next to the input.
    pub output_dir: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset (tracing `EnvFilter` syntax).
    pub log_filter: String,
    /// Per-currency overrides of the built-in USD exchange rates
    /// (units of currency per 1 USD, keyed by ISO-4217 code).
    pub currency_rates: BTreeMap<String, f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_paper_size: crate::PaperSize::A4,
            jpeg_quality: 90,
            csv_delimiter: ',',
            xml_root_element: "root".into(),
            password_length: 16,
            output_dir: None,
            log_filter: "info".into(),
            currency_rates: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load the config at `path`, or defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Reject values the tools cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ToolhubError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if !(4..=128).contains(&self.password_length) {
            return Err(ToolhubError::Config(format!(
                "password_length must be 4-128, got {}",
                self.password_length
            )));
        }
        if !self.csv_delimiter.is_ascii() || self.csv_delimiter == '"' {
            return Err(ToolhubError::Config(format!(
                "csv_delimiter must be a single ASCII character other than '\"', got {:?}",
                self.csv_delimiter
            )));
        }
        if self.xml_root_element.trim().is_empty() {
            return Err(ToolhubError::Config("xml_root_element must not be empty".into()));
        }
        if let Some((code, rate)) = self
            .currency_rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(ToolhubError::Config(format!(
                "currency rate for {code} must be positive, got {rate}"
            )));
        }
        Ok(())
    }

    /// The CSV delimiter as the byte the `csv` crate expects.
    pub fn csv_delimiter_byte(&self) -> u8 {
        self.csv_delimiter as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.jpeg_quality = 75;
        config.currency_rates.insert("EUR".into(), 0.9);
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "password_length": 24 }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.password_length, 24);
        assert_eq!(config.jpeg_quality, 90);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        config.jpeg_quality = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.currency_rates.insert("XYZ".into(), -1.0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.csv_delimiter = '"';
        assert!(config.validate().is_err());
    }
}
