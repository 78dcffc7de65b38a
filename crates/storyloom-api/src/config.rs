//! Server configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use storyloom_gemini::GeminiConfig;
use thiserror::Error;

/// Default save file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "storyloom-save.json";
/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;

/// A required variable is missing or a value does not parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    /// A variable is set to something unusable.
    #[error("{name} is invalid: {reason}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider settings, including the API key.
    pub gemini: GeminiConfig,
    /// Save file location.
    pub store_path: PathBuf,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Config {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `GEMINI_API_KEY` is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let mut gemini = GeminiConfig::new(api_key.trim());
        if let Some(model) = var("GEMINI_TEXT_MODEL") {
            gemini = gemini.with_text_model(model);
        }
        if let Some(model) = var("GEMINI_IMAGE_MODEL") {
            gemini = gemini.with_image_model(model);
        }
        if let Some(secs) = var("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "GEMINI_TIMEOUT_SECS",
                reason: format!("{e}"),
            })?;
            gemini = gemini.with_timeout(Duration::from_secs(secs));
        }

        let port = match var("PORT") {
            Some(port) => port.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: format!("must be a valid u16: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gemini,
            store_path: var("STORYLOOM_STORE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from),
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
        })
    }
}
