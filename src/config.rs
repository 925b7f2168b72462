use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::storage::VAULT_DIR;

pub const APP_DIR: &str = "totion";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub vault_dir: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
}

/// `<config_dir>/totion/config.json`, outside the vault.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join("logs"))
}

pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the vault directory against `home`. Relative paths are taken
/// from the home directory; `..` components are refused.
pub fn resolve_vault_dir(config: &Config, home: &Path) -> Result<PathBuf, ConfigError> {
    let Some(raw) = config.vault_dir.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(home.join(VAULT_DIR));
    };
    let raw_path = Path::new(raw);
    if raw_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ConfigError::InvalidVaultDir(raw.to_string()));
    }
    if raw_path.is_absolute() {
        Ok(raw_path.to_path_buf())
    } else if raw == "~" {
        Ok(home.to_path_buf())
    } else if let Some(rest) = raw.strip_prefix("~/") {
        Ok(home.join(rest))
    } else {
        Ok(home.join(raw_path))
    }
}
