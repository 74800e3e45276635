//! Configuration for the NannyML Cloud SDK.
//!
//! This module provides:
//! - Core SDK configuration (CoreConfig)
//! - Environment variable loading
//! - TOML file parsing (`[cloud]` table)

use crate::errors::CoreError;
use crate::urls;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the instance URL.
pub const ENV_URL: &str = "NML_CLOUD_URL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "NML_CLOUD_API_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "NML_CLOUD_TIMEOUT_SECS";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Core config shared by every client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Instance URL, e.g. `https://nannyml.example.com`. `/api` and
    /// `/api/graphql` suffixes are tolerated.
    pub url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            url: String::new(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("nannyml-cloud-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cloud: CoreConfig,
}

impl CoreConfig {
    pub fn new(url: impl Into<String>, api_token: impl Into<String>) -> Self {
        CoreConfig {
            url: url.into(),
            api_token: Some(api_token.into()),
            ..CoreConfig::default()
        }
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Build a config purely from `NML_CLOUD_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut config = CoreConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a TOML document with a `[cloud]` table.
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| CoreError::Config(format!("failed to parse TOML: {}", e)))?;
        Ok(file.cloud)
    }

    /// Override file values with any `NML_CLOUD_*` environment variables that are set.
    pub fn apply_env_overrides(&mut self) -> Result<(), CoreError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_URL) {
            self.url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{} must be a positive integer, got {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        Ok(())
    }

    /// Whether an instance URL has been configured.
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Resolved GraphQL endpoint for the configured instance.
    pub fn graphql_endpoint(&self) -> Result<String, CoreError> {
        if !self.has_url() {
            return Err(CoreError::config("no NannyML Cloud url configured"));
        }
        urls::graphql_endpoint(self.url.trim())
    }
}

// =============================================================================
// TOML Loading
// =============================================================================

/// Load a TOML config file, then apply environment overrides.
///
/// # Arguments
///
/// * `path` - Path to the TOML file
pub fn load_toml(path: &Path) -> Result<CoreConfig, CoreError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("failed to read TOML file: {}", e)))?;

    let mut config = CoreConfig::from_toml_str(&content)?;
    config.apply_env_overrides()?;
    Ok(config)
}
