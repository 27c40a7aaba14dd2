//! Command surface exposed to the host.
//!
//! This module handles everything a user action goes through:
//! - The registry of palette commands (ids and display names)
//! - Availability checks for the active file
//! - Execution against the settings store and the vault
//! - Turning every outcome, including errors, into a [`Notice`]
//!
//! Errors never escape [`run_command`]; they become notices for the host to
//! show and nothing is retried.

use crate::category::Category;
use crate::filer::{self, Classification, FilerError};
use crate::settings::{ParaSettings, SettingsField};
use crate::store::{SettingsStorage, SettingsStore, StorageError};
use crate::template::{self, TemplateContext};
use crate::vault::Vault;
use std::fmt;

/// A palette entry registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CREATE_NEW_PARA: CommandSpec = CommandSpec {
    id: "create-new-para",
    name: "Create a new PARA",
};

pub const SEND_TO_ARCHIVE: CommandSpec = CommandSpec {
    id: "send-to-archive",
    name: "Send to Archive",
};

/// All registered palette commands.
pub const COMMANDS: [CommandSpec; 2] = [CREATE_NEW_PARA, SEND_TO_ARCHIVE];

/// Looks up a registered command by id.
pub fn find_command(id: &str) -> Option<CommandSpec> {
    COMMANDS.iter().copied().find(|command| command.id == id)
}

/// Whether a palette command can run right now.
///
/// "Create a new PARA" is always available. "Send to Archive" needs an active
/// file that is a project or area note and a configured archive folder.
pub fn is_available(
    command_id: &str,
    active_file: Option<&str>,
    settings: &ParaSettings,
) -> bool {
    match command_id {
        id if id == CREATE_NEW_PARA.id => true,
        id if id == SEND_TO_ARCHIVE.id => {
            active_file.is_some_and(|file| filer::can_send_to_archive(settings, file))
        }
        _ => false,
    }
}

/// Where the seed text for a new item comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Literal template text.
    Text(String),
    /// A template note inside the vault.
    VaultFile(String),
}

/// A user action to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParaCommand {
    /// Create a new item in a category folder.
    CreateNew {
        category: Category,
        name: String,
        template: Option<TemplateSource>,
    },
    /// Move a project or area note into the archive.
    SendToArchive { file: String },
    /// Move any note into a category folder.
    MoveTo { file: String, category: Category },
    /// Report which category a note belongs to.
    Classify { file: String },
    /// List the notes in a category folder.
    List { category: Category },
    /// Change one settings field and persist it.
    SetFolder { field: SettingsField, value: String },
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    /// The action was refused; the user can fix it (e.g. configure a folder).
    Warning,
    /// The action failed.
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Extra lines, such as the entries of a listing.
    pub details: Vec<String>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// True if the action did not happen.
    pub fn is_failure(&self) -> bool {
        matches!(self.level, NoticeLevel::Warning | NoticeLevel::Error)
    }
}

/// Failures of a command before they are turned into notices.
#[derive(Debug)]
pub enum CommandError {
    Filer(FilerError),
    Storage(StorageError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Filer(e) => write!(f, "{}", e),
            CommandError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<FilerError> for CommandError {
    fn from(e: FilerError) -> Self {
        CommandError::Filer(e)
    }
}

impl From<StorageError> for CommandError {
    fn from(e: StorageError) -> Self {
        CommandError::Storage(e)
    }
}

impl From<CommandError> for Notice {
    fn from(e: CommandError) -> Self {
        match &e {
            CommandError::Filer(
                FilerError::MissingConfiguration { .. }
                | FilerError::NotArchivable { .. }
                | FilerError::InvalidName { .. },
            ) => Notice::warning(e.to_string()),
            _ => Notice::error(e.to_string()),
        }
    }
}

/// Runs a command and reports the outcome as a notice.
///
/// # Examples
///
/// ```no_run
/// use parafile::commands::{run_command, ParaCommand};
/// use parafile::store::{JsonFileStorage, SettingsStore};
/// use parafile::vault::FsVault;
///
/// let mut vault = FsVault::open("/path/to/vault").unwrap();
/// let mut store = SettingsStore::open(JsonFileStorage::for_vault(vault.root()));
/// let notice = run_command(
///     ParaCommand::SendToArchive { file: "Projects/launch.md".to_string() },
///     &mut store,
///     &mut vault,
/// );
/// println!("{}", notice.message);
/// ```
pub fn run_command<S: SettingsStorage, V: Vault + ?Sized>(
    command: ParaCommand,
    store: &mut SettingsStore<S>,
    vault: &mut V,
) -> Notice {
    execute(command, store, vault).unwrap_or_else(Notice::from)
}

/// Runs a command, returning failures as errors instead of notices.
pub fn execute<S: SettingsStorage, V: Vault + ?Sized>(
    command: ParaCommand,
    store: &mut SettingsStore<S>,
    vault: &mut V,
) -> Result<Notice, CommandError> {
    match command {
        ParaCommand::CreateNew {
            category,
            name,
            template,
        } => create_new(store, vault, category, &name, template.as_ref()),
        ParaCommand::SendToArchive { file } => {
            let filed = filer::send_to_archive(vault, store.settings(), &file)?;
            Ok(moved_notice(&filed))
        }
        ParaCommand::MoveTo { file, category } => {
            let filed = filer::move_to_category(vault, store.settings(), &file, category)?;
            Ok(moved_notice(&filed))
        }
        ParaCommand::Classify { file } => {
            let message = match filer::classify(store.settings(), &file) {
                Classification::Classified(category) => {
                    format!("{} is in {}", file, category.plural_label())
                }
                Classification::Unclassified => format!("{} is unclassified", file),
            };
            Ok(Notice::info(message))
        }
        ParaCommand::List { category } => {
            let files = filer::list_category(vault, store.settings(), category)?;
            let message = match files.len() {
                0 => format!("No notes in {}", category.plural_label()),
                1 => format!("1 note in {}", category.plural_label()),
                n => format!("{} notes in {}", n, category.plural_label()),
            };
            Ok(Notice::info(message).with_details(files))
        }
        ParaCommand::SetFolder { field, value } => {
            store.update(field, value.clone())?;
            let message = if value.trim().is_empty() {
                format!("Cleared {}", field.label())
            } else {
                format!("{} set to {}", field.label(), value)
            };
            Ok(Notice::success(message))
        }
    }
}

fn create_new<S: SettingsStorage, V: Vault + ?Sized>(
    store: &SettingsStore<S>,
    vault: &mut V,
    category: Category,
    name: &str,
    template: Option<&TemplateSource>,
) -> Result<Notice, CommandError> {
    let settings = store.settings();
    // Fail on configuration before touching the template
    filer::category_folder(settings, category)?;

    let raw = match template {
        None => String::new(),
        Some(TemplateSource::Text(text)) => text.clone(),
        Some(TemplateSource::VaultFile(path)) => filer::read_template(vault, path)?,
    };
    let contents = template::render(&raw, &TemplateContext::for_item(name));

    let path = filer::create_in_category(vault, settings, category, name, &contents)?;
    Ok(Notice::success(format!(
        "Created {} {}",
        category.label().to_lowercase(),
        path
    )))
}

fn moved_notice(filed: &filer::Filed) -> Notice {
    if filed.is_noop() {
        Notice::info(format!(
            "{} is already in {}",
            filed.to,
            filed.category.plural_label()
        ))
    } else {
        Notice::success(format!("Moved {} to {}", filed.from, filed.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use crate::vault::FsVault;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup(data: serde_json::Value) -> (TempDir, FsVault, SettingsStore<MemoryStorage>) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vault = FsVault::open(temp_dir.path()).expect("Failed to open vault");
        let store = SettingsStore::open(MemoryStorage::with_data(data));
        (temp_dir, vault, store)
    }

    #[test]
    fn test_registry() {
        assert_eq!(find_command("send-to-archive"), Some(SEND_TO_ARCHIVE));
        assert_eq!(find_command("create-new-para").unwrap().name, "Create a new PARA");
        assert!(find_command("open-sample-modal").is_none());
    }

    #[test]
    fn test_availability() {
        let settings = ParaSettings {
            projects_folder: "Projects".to_string(),
            archives_folder: "Archives".to_string(),
            ..Default::default()
        };
        assert!(is_available("create-new-para", None, &settings));
        assert!(!is_available("send-to-archive", None, &settings));
        assert!(is_available("send-to-archive", Some("Projects/a.md"), &settings));
        assert!(!is_available("send-to-archive", Some("Inbox/a.md"), &settings));
        assert!(!is_available("unknown", Some("Projects/a.md"), &settings));
    }

    #[test]
    fn test_missing_configuration_is_warning() {
        let (_temp_dir, mut vault, mut store) = setup(json!({}));
        let notice = run_command(
            ParaCommand::CreateNew {
                category: Category::Resource,
                name: "idea.md".to_string(),
                template: None,
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.is_failure());
        assert!(notice.message.contains("resourcesFolder"));
    }

    #[test]
    fn test_create_with_text_template() {
        let (temp_dir, mut vault, mut store) = setup(json!({ "projectsFolder": "Projects" }));
        let notice = run_command(
            ParaCommand::CreateNew {
                category: Category::Project,
                name: "launch".to_string(),
                template: Some(TemplateSource::Text("# {{title}}".to_string())),
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Projects").join("launch.md")).unwrap(),
            "# launch"
        );
    }

    #[test]
    fn test_create_with_missing_vault_template() {
        let (temp_dir, mut vault, mut store) = setup(json!({ "projectsFolder": "Projects" }));
        let notice = run_command(
            ParaCommand::CreateNew {
                category: Category::Project,
                name: "launch".to_string(),
                template: Some(TemplateSource::VaultFile("Templates/none.md".to_string())),
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(!temp_dir.path().join("Projects").exists());
    }

    #[test]
    fn test_send_to_archive_command() {
        let (temp_dir, mut vault, mut store) = setup(json!({
            "areasFolder": "Areas",
            "archivesFolder": "Archives",
        }));
        fs::create_dir(temp_dir.path().join("Areas")).unwrap();
        fs::write(temp_dir.path().join("Areas").join("home.md"), "").unwrap();

        let notice = run_command(
            ParaCommand::SendToArchive {
                file: "Areas/home.md".to_string(),
            },
            &mut store,
            &mut vault,
        );

        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Moved Areas/home.md to Archives/home.md");
    }

    #[test]
    fn test_move_missing_note_in_place_is_error() {
        let (temp_dir, mut vault, mut store) = setup(json!({ "archivesFolder": "Archives" }));
        fs::create_dir(temp_dir.path().join("Archives")).unwrap();

        let notice = run_command(
            ParaCommand::MoveTo {
                file: "Archives/ghost.md".to_string(),
                category: Category::Archive,
            },
            &mut store,
            &mut vault,
        );

        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.is_failure());
    }

    #[test]
    fn test_move_failure_is_error() {
        let (_temp_dir, mut vault, mut store) = setup(json!({ "archivesFolder": "Archives" }));
        let notice = run_command(
            ParaCommand::MoveTo {
                file: "ghost.md".to_string(),
                category: Category::Archive,
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn test_set_folder_persists() {
        let (_temp_dir, mut vault, mut store) = setup(json!({}));
        let notice = run_command(
            ParaCommand::SetFolder {
                field: SettingsField::ArchivesFolder,
                value: "Archives".to_string(),
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(notice.message, "Archives Folder set to Archives");
        assert_eq!(
            store.storage().data().unwrap()["archivesFolder"],
            json!("Archives")
        );
    }

    #[test]
    fn test_classify_and_list() {
        let (temp_dir, mut vault, mut store) = setup(json!({ "resourcesFolder": "Resources" }));
        fs::create_dir(temp_dir.path().join("Resources")).unwrap();
        fs::write(temp_dir.path().join("Resources").join("rust.md"), "").unwrap();

        let classified = run_command(
            ParaCommand::Classify {
                file: "Resources/rust.md".to_string(),
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(classified.message, "Resources/rust.md is in Resources");

        let listed = run_command(
            ParaCommand::List {
                category: Category::Resource,
            },
            &mut store,
            &mut vault,
        );
        assert_eq!(listed.message, "1 note in Resources");
        assert_eq!(listed.details, vec!["Resources/rust.md"]);
    }
}
