// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration discovery and loading.

use crate::error::{ConfigError, CplError, Result};
use std::path::{Path, PathBuf};

use super::schema::PolicyConfig;

/// Configuration file names to search for, in order of priority.
pub const CONFIG_FILES: &[&str] = &["cpl.toml", ".cpl.toml", ".config/cpl.toml"];

/// Find the configuration file in the current directory or parent directories.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    if let Some(found) = find_in_ancestors(start_dir) {
        return Some(found);
    }

    // Fall back to the user's home directory
    if let Some(home) = dirs::home_dir() {
        for config_name in CONFIG_FILES {
            let config_path = home.join(config_name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }
    }

    // Then the XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        let cpl_config = config_dir.join("cpl").join("config.toml");
        if cpl_config.is_file() {
            return Some(cpl_config);
        }
    }

    None
}

/// Search `start_dir` and its parents only.
fn find_in_ancestors(start_dir: &Path) -> Option<PathBuf> {
    start_dir.ancestors().find_map(|dir| {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Load configuration from the default locations.
///
/// Without a configuration file the canonical policy applies.
pub fn load_config() -> Result<PolicyConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found, using the canonical policy");
            Ok(PolicyConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<PolicyConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(CplError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        CplError::Config(ConfigError::ParseError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    parse_config(&content)
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<PolicyConfig> {
    let config: PolicyConfig = toml::from_str(content).map_err(|e| {
        CplError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })?;

    config.validate()?;

    tracing::debug!(
        extends = %config.extends,
        overrides = config.rules.len(),
        ignores = config.ignores.len(),
        "Configuration loaded"
    );

    Ok(config)
}
