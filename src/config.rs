//! Application configuration management.
//!
//! Settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML config file (`--config`, else `config.toml` in the platform
//!    config directory when it exists)
//! 3. Environment variables prefixed with `ROWDUPE_` (`__` for nesting)
//! 4. CLI flags ([`ConfigOverrides`])

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::{DEFAULT_REPORT_FILE, DEFAULT_UNIQUE_FIELDS};
use crate::generator::{
    default_templates, BalanceRange, GeneratorConfig, DEFAULT_ROUNDS, DEFAULT_SOURCE_FILE,
};

/// Environment variable prefix for configuration values.
pub const ENV_PREFIX: &str = "ROWDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source collection path
    pub source: PathBuf,
    /// Duplicate report path
    pub report: PathBuf,
    /// Fields the duplicate key is built from, in order
    pub unique_fields: Vec<String>,
    /// Replication rounds for generation
    pub rounds: usize,
    /// Lowest generated balance (inclusive)
    pub balance_min: i64,
    /// Highest generated balance (inclusive)
    pub balance_max: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_FILE),
            report: PathBuf::from(DEFAULT_REPORT_FILE),
            unique_fields: DEFAULT_UNIQUE_FIELDS.iter().map(|f| f.to_string()).collect(),
            rounds: DEFAULT_ROUNDS,
            balance_min: BalanceRange::DEFAULT.min(),
            balance_max: BalanceRange::DEFAULT.max(),
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<usize>,
}

impl Config {
    /// Load the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly given config file does not exist, or if any
    /// layer holds a value of the wrong type.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(path) = file {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }
        let file = file.map(Path::to_path_buf).or_else(Self::default_path);
        Self::figment(file.as_deref(), ENV_PREFIX, overrides)
            .extract()
            .context("Failed to load configuration")
    }

    /// Build the provider stack without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>, env_prefix: &str, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            log::debug!("Reading config file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(env_prefix).split("__"))
            .merge(Serialized::defaults(overrides))
    }

    /// The balance range for generation.
    ///
    /// # Errors
    ///
    /// Fails when `balance_min` is greater than `balance_max`.
    pub fn balance_range(&self) -> Result<BalanceRange> {
        BalanceRange::new(self.balance_min, self.balance_max).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid balance range: balance_min ({}) is greater than balance_max ({})",
                self.balance_min,
                self.balance_max
            )
        })
    }

    /// Generator settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Fails when the balance range is invalid, or when `rounds` is so
    /// large that the record count overflows.
    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        let config = GeneratorConfig {
            templates: default_templates(),
            rounds: self.rounds,
            balance: self.balance_range()?,
        };
        if config.record_count().is_none() {
            anyhow::bail!(
                "Invalid rounds: {} rounds of {} templates is too many records",
                self.rounds,
                config.templates.len()
            );
        }
        Ok(config)
    }

    /// The default platform-specific configuration file, if it exists.
    fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "rowdupe", "rowdupe")?;
        let path = project_dirs.config_dir().join("config.toml");
        path.exists().then_some(path)
    }
}
