//! # Application Configuration
//!
//! Loads the `sheetmeta` configuration in layers:
//!
//! 1. built-in defaults,
//! 2. an optional `sheetmeta.yml` (or the file passed with `--config`), with
//!    `${VAR}` references substituted from the environment,
//! 3. plain environment variables for top-level keys (e.g. `DB_URL`),
//! 4. `SHEETMETA_`-prefixed variables (e.g. `SHEETMETA_REQUEST_TIMEOUT_SECS`).
//!
//! The spreadsheet ID and range are not part of this file; they live in the
//! content store and are edited with `sheetmeta settings set`.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use sheetmeta::constants::{CREDENTIALS_FILE_NAME, DEFAULT_DB_FILE, DEFAULT_SHEETS_API_BASE_URL};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The configuration file read from the working directory when no override is given.
pub const DEFAULT_CONFIG_FILE: &str = "sheetmeta.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `sheetmeta.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The path to the content database. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// Where the service-account key lives. Defaults to a file beside the executable.
    #[serde(default)]
    pub credentials_path: Option<String>,
    #[serde(default = "default_sheets_api_base_url")]
    pub sheets_api_base_url: String,
    /// Per-request timeout for the token and Sheets calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_db_url() -> String {
    DEFAULT_DB_FILE.to_string()
}

fn default_sheets_api_base_url() -> String {
    DEFAULT_SHEETS_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Resolves the credential file: the configured path, or
    /// `service-account-key.json` in the executable's directory.
    pub fn credentials_path(&self) -> PathBuf {
        if let Some(path) = &self.credentials_path {
            return PathBuf::from(path);
        }
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CREDENTIALS_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILE_NAME))
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// An explicit `config_path_override` must exist; the default `sheetmeta.yml`
/// is optional.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => read_and_substitute(DEFAULT_CONFIG_FILE)?,
    };
    if let Some(content) = file_content {
        info!(
            "Loading configuration from '{}'.",
            config_path_override.unwrap_or(DEFAULT_CONFIG_FILE)
        );
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Top-level keys such as `DB_URL`.
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("SHEETMETA")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
