//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use teach_lib::ClientConfig;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings layered from a config file and `CBOX_*` environment variables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Classification service URL
    pub api_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Model used by `teach` when none is given
    pub default_model: Option<String>,
}

impl Settings {
    /// Load settings; an explicit `path` must exist, the default one may not
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = Self::config_path() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let config = builder
            .add_source(config::Environment::with_prefix("CBOX").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        config.try_deserialize().context("Invalid configuration")
    }

    /// Client settings; `api_url` comes from the command line and wins
    pub fn client_config(&self, api_url: Option<&str>) -> ClientConfig {
        ClientConfig {
            base_url: api_url
                .map(str::to_string)
                .or_else(|| self.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    /// Resolve the model to teach
    pub fn model_id(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .or_else(|| self.default_model.clone())
            .context("No model given; pass --model or set default_model in the config")
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("cbox").join("config.toml"))
    }
}
