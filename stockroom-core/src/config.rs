//! Configuration loading for Stockroom.
//!
//! Every section falls back to its default when absent from the file, so an
//! empty TOML document yields [`StockroomConfig::default`]. Unknown keys are
//! rejected.

use crate::{ConfigError, RegionTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "STOCKROOM_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StockroomConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    /// Region name → delegation ids.
    #[serde(default)]
    pub regions: RegionTable,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Dashboard credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub admin_email: String,
    pub admin_password: String,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_min_password_length() -> usize {
    6
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@admin.com".to_string(),
            admin_password: "admin".to_string(),
            min_password_length: default_min_password_length(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default = "default_json")]
    pub json: bool,
}

fn default_log_filter() -> String {
    "stockroom_core=info,stockroom_storage=info,warn".to_string()
}

fn default_json() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: default_json(),
        }
    }
}

impl StockroomConfig {
    /// Locate, read and validate the config file.
    ///
    /// The path comes from `--config <path>` on the command line, or from
    /// `STOCKROOM_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            regions = config.regions.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: StockroomConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.admin_email.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.admin_email",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.auth.admin_email.contains('@') {
            return Err(ConfigError::InvalidValue {
                field: "auth.admin_email",
                reason: "must be an email address".to_string(),
            });
        }
        if self.auth.min_password_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "auth.min_password_length",
                reason: "must be > 0".to_string(),
            });
        }
        if self.auth.admin_password.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.admin_password",
                reason: "must not be empty".to_string(),
            });
        }
        if self.regions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "regions",
                reason: "at least one region is required".to_string(),
            });
        }
        if self.telemetry.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "telemetry.log_filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
