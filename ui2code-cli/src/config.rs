//! CLI configuration management
//!
//! Settings are layered, later sources winning:
//! built-in defaults, `ui2code.toml` in the platform config directory,
//! `./ui2code.toml` (or the file passed with `--config`), then `UI2CODE_*`
//! environment variables. Command-line flags are applied on top by each
//! command.

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use ui2code_core::EvaluationConfig;
use ui2code_sdk::SdkConfig;

/// Base name of the configuration file, without extension.
pub const CONFIG_FILE_NAME: &str = "ui2code";

/// Prefix for environment overrides, e.g. `UI2CODE_EVALUATION__LIMIT=5`.
pub const ENV_PREFIX: &str = "UI2CODE";

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Dataset, prompts, model parameters and renderer
    pub evaluation: EvaluationConfig,

    /// Model endpoint settings
    pub api: ApiSettings,
}

/// Model endpoint settings.
///
/// The API key is only ever read from `OPENAI_API_KEY`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    /// Overrides `OPENAI_API_BASE`
    pub base_url: Option<String>,

    /// Request timeout in seconds; unset leaves the client default
    pub timeout_secs: Option<u64>,

    /// Retries for 429/5xx responses
    pub max_retries: u32,
}

impl CliConfig {
    /// Load the layered configuration.
    ///
    /// An explicit `path` must exist; the default locations are optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder();

        if let Some(global) = Self::global_config_path() {
            builder = builder.add_source(File::from(global).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path.to_path_buf()).required(true)),
            None => builder.add_source(File::with_name(CONFIG_FILE_NAME).required(false)),
        };

        let loaded = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("evaluation.renderer.command"),
            )
            .build()
            .context("Failed to load configuration")?;

        loaded
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// `<platform config dir>/ui2code.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "ui2code", "ui2code")
            .map(|dirs| dirs.config_dir().join(format!("{}.toml", CONFIG_FILE_NAME)))
    }

    /// SDK configuration from `OPENAI_*` variables plus the `[api]` section.
    pub fn sdk_config(&self, verbose: bool) -> SdkConfig {
        let mut config = SdkConfig::from_env()
            .with_max_retries(self.api.max_retries)
            .with_logging(verbose);

        if let Some(base_url) = &self.api.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.api.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}
