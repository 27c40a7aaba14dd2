//! Persistence of the PARA settings.
//!
//! The host owns a small key-value storage slot for the plugin: it hands back
//! whatever blob was last saved (or nothing on first run) and stores a new blob
//! on request. [`SettingsStore`] layers the settings lifecycle on top of it:
//! load once at startup, merge over defaults, save after every change.

use crate::settings::{ParaSettings, SettingsField};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from the host storage slot.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The blob could not be parsed or serialized.
    Serialization(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Settings storage error at {}: {}", path.display(), source)
            }
            Self::Serialization(msg) => write!(f, "Settings serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Why stored settings were discarded in favour of defaults.
///
/// Recovered inside [`SettingsStore::load`]; kept only for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLoadError {
    pub reason: String,
}

impl std::fmt::Display for StorageLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stored settings were malformed: {}", self.reason)
    }
}

impl std::error::Error for StorageLoadError {}

/// The host's persisted key-value slot for this plugin.
pub trait SettingsStorage {
    /// Returns the stored blob, or `None` if nothing was ever saved.
    fn load_data(&self) -> Result<Option<Value>, StorageError>;

    /// Replaces the stored blob. One call is one atomic write.
    fn save_data(&mut self, data: &Value) -> Result<(), StorageError>;
}

/// Stores the blob as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// File name used inside a vault's settings directory.
    pub const DEFAULT_FILE_NAME: &'static str = "data.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location for a vault: `<vault>/.para/data.json`.
    pub fn for_vault(vault_root: &Path) -> Self {
        Self::new(vault_root.join(".para").join(Self::DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStorage for JsonFileStorage {
    fn load_data(&self) -> Result<Option<Value>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn save_data(&mut self, data: &Value) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write to a sibling file first so a crash never leaves half a blob behind
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }
}

/// Keeps the blob in memory. Useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Option<Value>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a pre-existing blob, as if saved by an earlier run.
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            writes: 0,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Number of `save_data` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SettingsStorage for MemoryStorage {
    fn load_data(&self) -> Result<Option<Value>, StorageError> {
        Ok(self.data.clone())
    }

    fn save_data(&mut self, data: &Value) -> Result<(), StorageError> {
        self.data = Some(data.clone());
        self.writes += 1;
        Ok(())
    }
}

/// Owns the settings record and its load/save lifecycle.
///
/// Business logic never holds on to the store; callers pass
/// [`SettingsStore::settings`] into the filer at call time.
pub struct SettingsStore<S: SettingsStorage> {
    storage: S,
    settings: ParaSettings,
    load_error: Option<StorageLoadError>,
}

impl<S: SettingsStorage> SettingsStore<S> {
    /// Creates a store and immediately loads from `storage`.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            settings: ParaSettings::default(),
            load_error: None,
        };
        store.load();
        store
    }

    /// Reloads settings from storage, merged over defaults.
    ///
    /// Never fails: absent, unreadable or malformed data yields defaults for
    /// whatever could not be read.
    pub fn load(&mut self) -> &ParaSettings {
        let (settings, problem) = match self.storage.load_data() {
            Ok(None) => (ParaSettings::default(), None),
            Ok(Some(value)) => ParaSettings::merge_over_defaults(&value),
            Err(e) => (ParaSettings::default(), Some(e.to_string())),
        };

        self.settings = settings;
        self.load_error = problem.map(|reason| StorageLoadError { reason });
        &self.settings
    }

    /// Persists the full settings record and makes it current.
    pub fn save(&mut self, settings: &ParaSettings) -> Result<(), StorageError> {
        let value = serde_json::to_value(settings)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.save_data(&value)?;
        self.settings = settings.clone();
        Ok(())
    }

    /// Sets one field and saves immediately.
    ///
    /// On a failed write the in-memory settings stay as they were.
    pub fn update(
        &mut self,
        field: SettingsField,
        value: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut updated = self.settings.clone();
        updated.set(field, value);
        self.save(&updated)
    }

    /// The current settings.
    pub fn settings(&self) -> &ParaSettings {
        &self.settings
    }

    /// Why the last load fell back to defaults, if it did.
    pub fn last_load_error(&self) -> Option<&StorageLoadError> {
        self.load_error.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
