//! Pure path normalization logic
//!
//! Handles `~` expansion for the data directory and config file paths

use std::path::PathBuf;
use crate::error::{CliError, CliResult};

/// Default data directory when neither flag, env nor config names one
pub const DEFAULT_DATA_DIR: &str = "./funds";

/// Expand a path that may contain ~/ prefix
pub fn expand_home_directory(path: &str) -> CliResult<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(CliError::HomeDirectoryNotFound)?;
        Ok(home.join(rest))
    } else if path == "~" {
        dirs::home_dir().ok_or(CliError::HomeDirectoryNotFound)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Normalize a user-supplied path string
pub fn normalize_path(path: &str) -> CliResult<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(CliError::PathError("Path cannot be empty".to_string()));
    }

    expand_home_directory(path)
}

/// Pick the data directory: explicit flag/env first, then config, then the default
pub fn resolve_data_dir(flag: Option<&str>, configured: Option<&str>) -> CliResult<PathBuf> {
    match flag.or(configured) {
        Some(path) => normalize_path(path),
        None => Ok(PathBuf::from(DEFAULT_DATA_DIR)),
    }
}
