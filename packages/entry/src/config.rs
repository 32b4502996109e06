//! Import settings.
//!
//! Defaults are embedded from `config/default.toml`. A user config file
//! only needs the keys it wants to change:
//!
//! ```toml
//! user = "county_import"
//!
//! [normalization]
//! suffix_threshold = 90.0
//! ```

use std::path::Path;

use nominatim_import_address::NormalizationConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors from loading or validating an [`ImportConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ImportConfig`].
    #[error("Failed to parse config {path}: {message}")]
    Parse {
        /// Path (or `<embedded>`) of the offending document.
        path: String,
        /// Parser error text.
        message: String,
    },

    /// Suffix threshold outside `0..=100`.
    #[error("Suffix threshold must be between 0 and 100, got {value}")]
    InvalidThreshold {
        /// The rejected value.
        value: f64,
    },
}

/// Settings for an import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// `user` attribute written on every node.
    #[serde(default = "default_user")]
    pub user: String,

    /// Extension for generated output filenames, without the leading dot.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Fail the batch on records the tagger classifies as ambiguous
    /// instead of importing whatever it could tag.
    #[serde(default)]
    pub reject_ambiguous: bool,

    #[serde(default)]
    pub normalization: NormalizationConfig,
}

fn default_user() -> String {
    "osm_imports".to_string()
}

fn default_output_extension() -> String {
    "osm.xml".to_string()
}

impl Default for ImportConfig {
    /// Parses the embedded `config/default.toml`.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a build-time guarantee).
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG_TOML, "<embedded>")
            .unwrap_or_else(|e| panic!("Failed to parse embedded import config: {e}"))
    }
}

impl ImportConfig {
    /// Parses and validates a TOML document. `origin` is only used in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::InvalidThreshold`] for an out-of-range threshold.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. Keys it leaves out keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml_str(&contents, &path.display().to_string())?;
        log::info!("Loaded import config from {}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] if the suffix threshold
    /// is not a number in `0..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let value = self.normalization.suffix_threshold;
        if (0.0..=100.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold { value })
        }
    }

    /// A fresh `<uuid v4>.<extension>` output filename.
    #[must_use]
    pub fn default_filename(&self) -> String {
        format!("{}.{}", uuid::Uuid::new_v4(), self.output_extension)
    }
}
