//! Host configuration for the command-line front end.
//!
//! The CLI plays the host application: it needs to know which directory is the
//! vault, where the plugin settings blob lives and which template to seed new
//! items with when none is given. These come from a TOML file:
//!
//! ```toml
//! vault = "/home/me/Notes"
//! settings_file = ".para/data.json"   # relative to the vault
//! default_template = "Templates/para.md"
//! ```

use crate::store::JsonFileStorage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading the host configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Host settings for the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Vault root directory. Defaults to the current directory.
    pub vault: Option<PathBuf>,
    /// Settings blob location; relative paths are resolved against the vault.
    pub settings_file: Option<PathBuf>,
    /// Vault path of the template used when `new` gets no `--template`.
    pub default_template: Option<String>,
}

impl AppConfig {
    /// Local configuration file name looked up in the working directory.
    pub const LOCAL_FILE_NAME: &'static str = ".pararc.toml";

    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.pararc.toml` in the current directory
    /// 3. Look for `~/.config/parafile/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if a discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(Self::LOCAL_FILE_NAME);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("parafile")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// Relative `vault` paths are resolved against the file's directory.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        if let Some(vault) = &config.vault
            && vault.is_relative()
            && let Some(dir) = path.parent()
        {
            config.vault = Some(dir.join(vault));
        }

        Ok(config)
    }

    /// The vault root: the override if given, else the configured one, else `.`.
    pub fn vault_root(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.vault.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The settings storage for a vault.
    pub fn settings_storage(&self, vault_root: &Path) -> JsonFileStorage {
        match &self.settings_file {
            Some(path) if path.is_absolute() => JsonFileStorage::new(path),
            Some(path) => JsonFileStorage::new(vault_root.join(path)),
            None => JsonFileStorage::for_vault(vault_root),
        }
    }
}
