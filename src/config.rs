// src/config.rs
use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml;

const CONFIG_FILE_NAME: &str = "savepass_config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the credential store. Platform data dir when unset.
    pub storage_dir: Option<PathBuf>,
    /// Print passwords in clear when listing.
    pub show_passwords: bool,
}

impl Config {
    /// Resolves where the store lives: explicit override, then config, then platform default.
    pub fn resolve_storage_dir(&self, override_dir: Option<PathBuf>) -> ConfigResult<PathBuf> {
        if let Some(dir) = override_dir.or_else(|| self.storage_dir.clone()) {
            return Ok(dir);
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ConfigError::NoProjectDirs("data"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "SavePass", "SavePass")
}

fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn save_default_config(config_path: &Path, config: &Config) -> ConfigResult<()> {
    info!("Attempting to save default config to {:?}", config_path);
    let io_err = |source: std::io::Error| ConfigError::Io { path: config_path.to_path_buf(), source };

    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir).map_err(|source| ConfigError::Io {
                path: parent_dir.to_path_buf(),
                source,
            })?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string = toml::to_string_pretty(config)?;
    let mut file = fs::File::create(config_path).map_err(io_err)?;
    file.write_all(toml_string.as_bytes()).map_err(io_err)?;

    info!("Saved default configuration to {:?}", config_path);
    Ok(())
}

/// Reads the config at `config_path`, creating it with defaults when missing.
/// Unreadable or unparsable files fall back to defaults with a warning.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(
            "Config file not found at {:?}. Creating and using default configuration.",
            config_path
        );
        let default_config = Config::default();
        if let Err(e) = save_default_config(config_path, &default_config) {
            warn!("Failed to save default configuration: {}", e);
        }
        return default_config;
    }

    info!("Loading configuration from {:?}", config_path);
    match fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(loaded_config) => {
                info!("Configuration loaded successfully.");
                loaded_config
            }
            Err(e) => {
                warn!(
                    "Failed to parse config file at {:?}: {}. Using default configuration.",
                    config_path, e
                );
                Config::default()
            }
        },
        Err(e) => {
            warn!(
                "Failed to read config file at {:?}: {}. Using default configuration.",
                config_path, e
            );
            Config::default()
        }
    }
}

pub fn load_config() -> Config {
    match get_config_path() {
        Some(config_path) => load_config_from(&config_path),
        None => {
            warn!("Could not determine config directory. Using default configuration.");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage_dir, None);
        assert!(!config.show_passwords);
    }

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = load_config_from(&config_path);
        assert_eq!(config, Config::default());
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        let reparsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(reparsed, Config::default());
    }

    #[test]
    fn test_load_existing_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "storage_dir = \"/tmp/vault\"\nshow_passwords = true\n").unwrap();

        let config = load_config_from(&config_path);
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/vault")));
        assert!(config.show_passwords);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "show_passwords = true\n").unwrap();

        let config = load_config_from(&config_path);
        assert_eq!(config.storage_dir, None);
        assert!(config.show_passwords);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml content = definitely_broken").unwrap();

        assert_eq!(load_config_from(&config_path), Config::default());
    }

    #[test]
    fn test_storage_dir_resolution_order() {
        let config = Config {
            storage_dir: Some(PathBuf::from("/from/config")),
            show_passwords: false,
        };
        assert_eq!(
            config.resolve_storage_dir(Some(PathBuf::from("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(config.resolve_storage_dir(None).unwrap(), PathBuf::from("/from/config"));
    }
}
