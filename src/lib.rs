//! parafile - PARA note organization
//!
//! This library classifies notes into the four PARA categories (Projects,
//! Areas, Resources, Archives) by the folder they live in, files notes into
//! the configured category folders, creates new items from templates and
//! persists the folder settings. All file access goes through the [`Vault`]
//! trait and all settings storage through [`SettingsStorage`], so the same
//! logic can run inside any host.

pub mod category;
pub mod commands;
pub mod config;
pub mod filer;
pub mod output;
pub mod settings;
pub mod store;
pub mod template;
pub mod vault;
pub mod views;

pub use category::Category;
pub use commands::{Notice, NoticeLevel, ParaCommand, run_command};
pub use config::{AppConfig, ConfigError};
pub use filer::{Classification, FilerError, classify};
pub use settings::{ParaSettings, SettingsField};
pub use store::{JsonFileStorage, MemoryStorage, SettingsStorage, SettingsStore};
pub use vault::{FsVault, Vault, VaultError};
