//! CLI configuration loader and fund defaults.

use crate::error::{CliError, CliResult};
use crate::logic;
use lib_chitfund::DurationUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI config filename under ~/.chitfund/
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Base directory holding one subdirectory per fund
    pub data_dir: Option<String>,
    pub defaults: Option<FundDefaults>,
}

/// Values used when creating a fund without the corresponding flag
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FundDefaults {
    pub duration_unit: Option<String>,
    pub duration_count: Option<u32>,
}

impl FundDefaults {
    pub fn duration_unit(&self) -> CliResult<Option<DurationUnit>> {
        self.duration_unit
            .as_deref()
            .map(|unit| {
                logic::parse_duration_unit(unit)
                    .map_err(|e| CliError::ConfigError(format!("defaults.duration_unit: {}", e)))
            })
            .transpose()
    }

    pub fn duration_count(&self) -> CliResult<Option<u32>> {
        match self.duration_count {
            Some(0) => Err(CliError::ConfigError(
                "defaults.duration_count must be greater than zero".to_string(),
            )),
            other => Ok(other),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".chitfund").join(DEFAULT_CONFIG_FILENAME)
    } else {
        PathBuf::from("./chitfund.toml")
    }
}

/// Load the config file.
///
/// An explicitly named file must exist; a missing default file yields the
/// empty config.
pub fn load_config(path: Option<&str>) -> CliResult<CliConfig> {
    let config_path = match path {
        Some(p) => logic::normalize_path(p)?,
        None => default_config_path(),
    };

    if !config_path.exists() {
        if path.is_some() {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }
        return Ok(CliConfig::default());
    }

    load_config_strict(&config_path)
}

pub fn load_config_strict(path: &Path) -> CliResult<CliConfig> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    toml::from_str(&raw).map_err(|e| CliError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
