//! Engine configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

fn default_database_path() -> PathBuf {
    PathBuf::from("survey-engine.db")
}

fn default_max_free_text_len() -> usize {
    10_000
}

/// Engine configuration parsed from `config.toml`.
///
/// The public base URL is what respondents see in survey links and QR
/// codes; the engine never binds a socket itself.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Path to the `SQLite` database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Fully-qualified base URL for public survey links, no trailing slash.
    pub public_base_url: String,
    /// Storage-layer cap on free-text answer length, in characters.
    #[serde(default = "default_max_free_text_len")]
    pub max_free_text_len: usize,
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and normalize the base URL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Public URL where respondents take the survey with this public id.
    #[must_use]
    pub fn take_url(&self, public_id: &str) -> String {
        format!("{}/take/{public_id}/", self.public_base_url)
    }

    fn validate(&mut self) -> Result<()> {
        while self.public_base_url.ends_with('/') {
            self.public_base_url.pop();
        }

        if self.public_base_url.is_empty() {
            return Err(AppError::Config("public_base_url must not be empty".into()));
        }

        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(AppError::Config(
                "public_base_url must start with http:// or https://".into(),
            ));
        }

        if self.max_free_text_len == 0 {
            return Err(AppError::Config(
                "max_free_text_len must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
