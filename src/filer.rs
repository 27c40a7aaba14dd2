/// Classifying and filing notes into PARA folders.
///
/// The filer decides which configured category folder a note lives under and
/// moves or creates notes inside those folders. It holds no state of its own:
/// the current [`ParaSettings`] are passed in with every call, and all file
/// access goes through a [`Vault`].
use crate::category::Category;
use crate::settings::ParaSettings;
use crate::vault::{Vault, VaultError, base_name, join_path, normalize_path};
use std::fmt;

/// Extension given to new items whose name has none.
pub const DEFAULT_EXTENSION: &str = "md";

/// Where a note sits relative to the configured folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Under the folder configured for this category.
    Classified(Category),
    /// Under none of the configured folders.
    Unclassified,
}

impl Classification {
    pub fn category(&self) -> Option<Category> {
        match self {
            Classification::Classified(category) => Some(*category),
            Classification::Unclassified => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Classified(category) => f.write_str(category.id()),
            Classification::Unclassified => f.write_str("unclassified"),
        }
    }
}

/// A completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filed {
    /// Vault path before the move.
    pub from: String,
    /// Vault path after the move.
    pub to: String,
    /// The category the note was filed into.
    pub category: Category,
}

impl Filed {
    /// True if the note was already in place and nothing was moved.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Errors that can occur while filing notes.
#[derive(Debug)]
pub enum FilerError {
    /// No folder is configured for the target category. Nothing was changed.
    MissingConfiguration { category: Category },
    /// The vault refused the move. The source file is unchanged.
    MoveFailed {
        from: String,
        to: String,
        source: VaultError,
    },
    /// The vault refused to create the new item.
    CreateFailed { path: String, source: VaultError },
    /// The requested item name cannot be used.
    InvalidName { name: String, reason: String },
    /// Only projects and areas can be sent to the archive.
    NotArchivable {
        path: String,
        classification: Classification,
    },
    /// The template could not be read from the vault.
    TemplateUnavailable { path: String, source: VaultError },
    /// A category folder could not be listed.
    ListFailed { folder: String, source: VaultError },
}

impl fmt::Display for FilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConfiguration { category } => write!(
                f,
                "No {} folder is configured. Set {} in the settings first.",
                category.plural_label(),
                category.settings_key()
            ),
            Self::MoveFailed { from, to, source } => {
                write!(f, "Could not move {} to {}: {}", from, to, source)
            }
            Self::CreateFailed { path, source } => {
                write!(f, "Could not create {}: {}", path, source)
            }
            Self::InvalidName { name, reason } => {
                write!(f, "Invalid name '{}': {}", name, reason)
            }
            Self::NotArchivable {
                path,
                classification,
            } => write!(
                f,
                "{} is {}; only projects and areas can be sent to the archive",
                path,
                match classification {
                    Classification::Classified(category) => format!("a {}", category.id()),
                    Classification::Unclassified => "not in a PARA folder".to_string(),
                }
            ),
            Self::TemplateUnavailable { path, source } => {
                write!(f, "Could not read template {}: {}", path, source)
            }
            Self::ListFailed { folder, source } => {
                write!(f, "Could not list {}: {}", folder, source)
            }
        }
    }
}

impl std::error::Error for FilerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MoveFailed { source, .. }
            | Self::CreateFailed { source, .. }
            | Self::TemplateUnavailable { source, .. }
            | Self::ListFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for filer operations.
pub type FilerResult<T> = Result<T, FilerError>;

/// True if `path` lies strictly inside `folder` (both normalized).
fn is_under(path: &str, folder: &str) -> bool {
    path.strip_prefix(folder)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Returns the configured category folder a note lives under.
///
/// Folders are checked in the order Projects, Areas, Resources, Archives and
/// the first match wins. Matching respects folder boundaries: `Projects` does
/// not match `Projects2/plan.md`.
///
/// # Examples
///
/// ```
/// use parafile::category::Category;
/// use parafile::filer::{classify, Classification};
/// use parafile::settings::ParaSettings;
///
/// let settings = ParaSettings {
///     projects_folder: "Projects".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(
///     classify(&settings, "Projects/launch.md"),
///     Classification::Classified(Category::Project)
/// );
/// assert_eq!(classify(&settings, "Inbox/launch.md"), Classification::Unclassified);
/// ```
pub fn classify(settings: &ParaSettings, file_path: &str) -> Classification {
    let path = normalize_path(file_path);
    Category::LOOKUP_ORDER
        .into_iter()
        .find(|category| {
            settings
                .folder(*category)
                .is_some_and(|folder| is_under(&path, &folder))
        })
        .map_or(Classification::Unclassified, Classification::Classified)
}

/// Returns the configured folder for `category` or a `MissingConfiguration` error.
pub fn category_folder(settings: &ParaSettings, category: Category) -> FilerResult<String> {
    settings
        .folder(category)
        .ok_or(FilerError::MissingConfiguration { category })
}

/// Computes where `file_path` would land when filed into `target`.
pub fn destination_for(
    settings: &ParaSettings,
    file_path: &str,
    target: Category,
) -> FilerResult<String> {
    let folder = category_folder(settings, target)?;
    Ok(join_path(&folder, base_name(&normalize_path(file_path))))
}

/// Creates the category folder if it does not exist yet.
fn ensure_folder<V: Vault + ?Sized>(vault: &mut V, folder: &str) -> Result<(), VaultError> {
    if vault.is_folder(folder) {
        return Ok(());
    }
    vault.create_folder(folder)
}

/// Moves a note into the folder configured for `target`.
///
/// The destination is `<folder>/<base name>`. When the folder is not
/// configured nothing is touched and `MissingConfiguration` is returned. Any
/// refusal from the vault (name collision, missing source, permissions) is
/// reported as `MoveFailed` with the source left in place. A source that is
/// not a file fails the same way before any folder is created. A note already
/// at its destination is reported as a no-op without a rename.
///
/// # Examples
///
/// ```no_run
/// use parafile::category::Category;
/// use parafile::filer::move_to_category;
/// use parafile::settings::ParaSettings;
/// use parafile::vault::FsVault;
///
/// let mut vault = FsVault::open("/path/to/vault").unwrap();
/// let settings = ParaSettings {
///     archives_folder: "Archives".to_string(),
///     ..Default::default()
/// };
/// match move_to_category(&mut vault, &settings, "Projects/note.md", Category::Archive) {
///     Ok(filed) => println!("Moved to {}", filed.to),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn move_to_category<V: Vault + ?Sized>(
    vault: &mut V,
    settings: &ParaSettings,
    file_path: &str,
    target: Category,
) -> FilerResult<Filed> {
    let from = normalize_path(file_path);
    let to = destination_for(settings, &from, target)?;

    let move_failed = |source: VaultError, from: &str, to: &str| FilerError::MoveFailed {
        from: from.to_string(),
        to: to.to_string(),
        source,
    };

    // Only files move; a folder or missing source fails before anything is created
    if !vault.is_file(&from) {
        return Err(move_failed(
            VaultError::NotFound { path: from.clone() },
            &from,
            &to,
        ));
    }

    if from == to {
        return Ok(Filed {
            from,
            to,
            category: target,
        });
    }

    let folder = category_folder(settings, target)?;
    ensure_folder(vault, &folder).map_err(|e| move_failed(e, &from, &to))?;
    vault
        .rename(&from, &to)
        .map_err(|e| move_failed(e, &from, &to))?;

    Ok(Filed {
        from,
        to,
        category: target,
    })
}

/// Sends a project or area note to the archive folder.
///
/// Notes that are resources, already archived or outside every configured
/// folder are refused with `NotArchivable`.
pub fn send_to_archive<V: Vault + ?Sized>(
    vault: &mut V,
    settings: &ParaSettings,
    file_path: &str,
) -> FilerResult<Filed> {
    let classification = classify(settings, file_path);
    let archivable = classification
        .category()
        .is_some_and(|category| category.is_archivable());
    if !archivable {
        return Err(FilerError::NotArchivable {
            path: normalize_path(file_path),
            classification,
        });
    }
    move_to_category(vault, settings, file_path, Category::Archive)
}

/// True if "Send to Archive" applies to `file_path` under `settings`.
pub fn can_send_to_archive(settings: &ParaSettings, file_path: &str) -> bool {
    settings.folder(Category::Archive).is_some()
        && classify(settings, file_path)
            .category()
            .is_some_and(|category| category.is_archivable())
}

/// Validates an item name and appends the default extension when missing.
pub fn item_file_name(name: &str) -> FilerResult<String> {
    let trimmed = name.trim();
    let invalid = |reason: &str| FilerError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("name is empty"));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(invalid("name must not contain path separators"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(invalid("name must not be a relative path segment"));
    }

    let has_extension = trimmed
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty());
    if has_extension {
        return Ok(trimmed.to_string());
    }

    // "idea." has an empty extension, not a stem ending in a dot
    let stem = trimmed.trim_end_matches('.');
    if stem.is_empty() {
        return Err(invalid("name has no stem"));
    }
    Ok(format!("{}.{}", stem, DEFAULT_EXTENSION))
}

/// Creates a new item in the folder configured for `category`.
///
/// `contents` is the already-rendered seed text. Returns the vault path of the
/// new file. Fails with `MissingConfiguration` (nothing created) when the
/// folder is unset and with `CreateFailed` when the vault refuses, including
/// when a file with that name already exists.
pub fn create_in_category<V: Vault + ?Sized>(
    vault: &mut V,
    settings: &ParaSettings,
    category: Category,
    name: &str,
    contents: &str,
) -> FilerResult<String> {
    let folder = category_folder(settings, category)?;
    let file_name = item_file_name(name)?;
    let path = join_path(&folder, &file_name);

    let create_failed = |source: VaultError| FilerError::CreateFailed {
        path: path.clone(),
        source,
    };

    if vault.exists(&path) {
        return Err(create_failed(VaultError::AlreadyExists { path: path.clone() }));
    }
    ensure_folder(vault, &folder).map_err(create_failed)?;
    vault.create(&path, contents).map_err(create_failed)?;

    Ok(path)
}

/// Lists the notes under the folder configured for `category`.
///
/// A configured folder that does not exist yet has no notes.
pub fn list_category<V: Vault + ?Sized>(
    vault: &V,
    settings: &ParaSettings,
    category: Category,
) -> FilerResult<Vec<String>> {
    let folder = category_folder(settings, category)?;
    if !vault.is_folder(&folder) {
        return Ok(Vec::new());
    }
    // A note can sit under a nested configured folder; keep only the ones that classify here.
    vault
        .list_files(&folder)
        .map(|files| {
            files
                .into_iter()
                .filter(|file| classify(settings, file) == Classification::Classified(category))
                .collect()
        })
        .map_err(|source| FilerError::ListFailed { folder, source })
}

/// Reads a template from the vault.
pub fn read_template<V: Vault + ?Sized>(vault: &V, path: &str) -> FilerResult<String> {
    vault
        .read(path)
        .map_err(|source| FilerError::TemplateUnavailable {
            path: normalize_path(path),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::FsVault;
    use std::fs;
    use tempfile::TempDir;

    fn configured() -> ParaSettings {
        ParaSettings {
            projects_folder: "Projects".to_string(),
            areas_folder: "Areas".to_string(),
            resources_folder: "Resources".to_string(),
            archives_folder: "Archives".to_string(),
        }
    }

    fn vault() -> (TempDir, FsVault) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vault = FsVault::open(temp_dir.path()).expect("Failed to open vault");
        (temp_dir, vault)
    }

    #[test]
    fn test_classify_with_defaults_is_unclassified() {
        let settings = ParaSettings::default();
        for path in ["note.md", "Projects/a.md", "", "/", "Archives/x/y.md"] {
            assert_eq!(classify(&settings, path), Classification::Unclassified);
        }
    }

    #[test]
    fn test_classify_each_category() {
        let settings = configured();
        assert_eq!(
            classify(&settings, "Projects/a.md"),
            Classification::Classified(Category::Project)
        );
        assert_eq!(
            classify(&settings, "Areas/Health/log.md"),
            Classification::Classified(Category::Area)
        );
        assert_eq!(
            classify(&settings, "Resources/rust.md"),
            Classification::Classified(Category::Resource)
        );
        assert_eq!(
            classify(&settings, "Archives/old.md"),
            Classification::Classified(Category::Archive)
        );
        assert_eq!(classify(&settings, "Inbox/new.md"), Classification::Unclassified);
    }

    #[test]
    fn test_classify_respects_folder_boundaries() {
        let settings = configured();
        assert_eq!(
            classify(&settings, "Projects2/a.md"),
            Classification::Unclassified
        );
        assert_eq!(classify(&settings, "Projects"), Classification::Unclassified);
    }

    #[test]
    fn test_classify_first_configured_match_wins() {
        let settings = ParaSettings {
            projects_folder: "Work".to_string(),
            archives_folder: "Work/Done".to_string(),
            ..Default::default()
        };
        assert_eq!(
            classify(&settings, "Work/Done/a.md"),
            Classification::Classified(Category::Project)
        );
    }

    #[test]
    fn test_classify_normalizes_paths() {
        let settings = ParaSettings {
            areas_folder: "/Life/Areas/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            classify(&settings, "Life\\Areas\\home.md"),
            Classification::Classified(Category::Area)
        );
    }

    #[test]
    fn test_destination_uses_base_name() {
        let settings = configured();
        assert_eq!(
            destination_for(&settings, "Projects/Alpha/note.md", Category::Archive).unwrap(),
            "Archives/note.md"
        );
    }

    #[test]
    fn test_move_to_unset_category_changes_nothing() {
        let (temp_dir, mut vault) = vault();
        fs::write(temp_dir.path().join("note.md"), "x").unwrap();

        let result = move_to_category(
            &mut vault,
            &ParaSettings::default(),
            "note.md",
            Category::Project,
        );

        assert!(matches!(
            result,
            Err(FilerError::MissingConfiguration {
                category: Category::Project
            })
        ));
        assert!(temp_dir.path().join("note.md").exists());
    }

    #[test]
    fn test_move_to_archive() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir(temp_dir.path().join("Projects")).unwrap();
        fs::write(temp_dir.path().join("Projects").join("note.md"), "x").unwrap();

        let filed = move_to_category(
            &mut vault,
            &configured(),
            "Projects/note.md",
            Category::Archive,
        )
        .expect("Failed to move");

        assert_eq!(filed.to, "Archives/note.md");
        assert!(!filed.is_noop());
        assert!(temp_dir.path().join("Archives").join("note.md").exists());
        assert!(!temp_dir.path().join("Projects").join("note.md").exists());
    }

    #[test]
    fn test_move_missing_source_creates_nothing() {
        let (temp_dir, mut vault) = vault();

        let result = move_to_category(&mut vault, &configured(), "ghost.md", Category::Archive);

        assert!(matches!(result, Err(FilerError::MoveFailed { .. })));
        assert!(!temp_dir.path().join("Archives").exists());
    }

    #[test]
    fn test_move_collision_leaves_source() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir(temp_dir.path().join("Archives")).unwrap();
        fs::write(temp_dir.path().join("note.md"), "new").unwrap();
        fs::write(temp_dir.path().join("Archives").join("note.md"), "old").unwrap();

        let result = move_to_category(&mut vault, &configured(), "note.md", Category::Archive);

        assert!(matches!(result, Err(FilerError::MoveFailed { .. })));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("note.md")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_move_already_in_place_is_noop() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir(temp_dir.path().join("Archives")).unwrap();
        fs::write(temp_dir.path().join("Archives").join("a.md"), "kept").unwrap();

        let filed = move_to_category(&mut vault, &configured(), "Archives/a.md", Category::Archive)
            .expect("No-op move should succeed");

        assert!(filed.is_noop());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Archives").join("a.md")).unwrap(),
            "kept"
        );
    }

    #[test]
    fn test_move_missing_note_at_destination_fails() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir(temp_dir.path().join("Archives")).unwrap();

        let result = move_to_category(
            &mut vault,
            &configured(),
            "Archives/ghost.md",
            Category::Archive,
        );

        assert!(matches!(result, Err(FilerError::MoveFailed { .. })));
        assert!(!temp_dir.path().join("Archives").join("ghost.md").exists());
    }

    #[test]
    fn test_move_folder_source_creates_nothing() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir_all(temp_dir.path().join("Projects").join("Alpha")).unwrap();

        let result =
            move_to_category(&mut vault, &configured(), "Projects/Alpha", Category::Archive);
        assert!(matches!(result, Err(FilerError::MoveFailed { .. })));

        let result = move_to_category(&mut vault, &configured(), "", Category::Archive);
        assert!(matches!(result, Err(FilerError::MoveFailed { .. })));

        assert!(!temp_dir.path().join("Archives").exists());
        assert!(temp_dir.path().join("Projects").join("Alpha").is_dir());
    }

    #[test]
    fn test_send_to_archive_refuses_resources() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir(temp_dir.path().join("Resources")).unwrap();
        fs::write(temp_dir.path().join("Resources").join("r.md"), "").unwrap();

        let result = send_to_archive(&mut vault, &configured(), "Resources/r.md");

        assert!(matches!(result, Err(FilerError::NotArchivable { .. })));
        assert!(temp_dir.path().join("Resources").join("r.md").exists());
    }

    #[test]
    fn test_send_to_archive_moves_area_note() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir_all(temp_dir.path().join("Areas").join("Home")).unwrap();
        fs::write(temp_dir.path().join("Areas").join("Home").join("garden.md"), "").unwrap();

        let filed = send_to_archive(&mut vault, &configured(), "Areas/Home/garden.md").unwrap();

        assert_eq!(filed.to, "Archives/garden.md");
        assert_eq!(filed.category, Category::Archive);
    }

    #[test]
    fn test_can_send_to_archive() {
        let settings = configured();
        assert!(can_send_to_archive(&settings, "Projects/a.md"));
        assert!(!can_send_to_archive(&settings, "Archives/a.md"));
        assert!(!can_send_to_archive(&settings, "loose.md"));

        let no_archive = ParaSettings {
            archives_folder: String::new(),
            ..configured()
        };
        assert!(!can_send_to_archive(&no_archive, "Projects/a.md"));
    }

    #[test]
    fn test_item_file_name() {
        assert_eq!(item_file_name("idea.md").unwrap(), "idea.md");
        assert_eq!(item_file_name(" idea ").unwrap(), "idea.md");
        assert_eq!(item_file_name(".hidden").unwrap(), ".hidden.md");
        assert_eq!(item_file_name("idea.").unwrap(), "idea.md");
        assert_eq!(item_file_name("idea..").unwrap(), "idea.md");
        assert!(item_file_name("").is_err());
        assert!(item_file_name("a/b.md").is_err());
        assert!(item_file_name("..").is_err());
    }

    #[test]
    fn test_create_in_unset_category() {
        let (temp_dir, mut vault) = vault();
        let result = create_in_category(
            &mut vault,
            &ParaSettings::default(),
            Category::Resource,
            "idea.md",
            "",
        );
        assert!(matches!(result, Err(FilerError::MissingConfiguration { .. })));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_create_in_category_creates_folder_and_file() {
        let (temp_dir, mut vault) = vault();
        let path = create_in_category(
            &mut vault,
            &configured(),
            Category::Resource,
            "idea.md",
            "# idea",
        )
        .expect("Failed to create");

        assert_eq!(path, "Resources/idea.md");
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Resources").join("idea.md")).unwrap(),
            "# idea"
        );
    }

    #[test]
    fn test_create_does_not_overwrite() {
        let (temp_dir, mut vault) = vault();
        fs::create_dir(temp_dir.path().join("Projects")).unwrap();
        fs::write(temp_dir.path().join("Projects").join("plan.md"), "keep").unwrap();

        let result =
            create_in_category(&mut vault, &configured(), Category::Project, "plan", "new");

        assert!(matches!(result, Err(FilerError::CreateFailed { .. })));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Projects").join("plan.md")).unwrap(),
            "keep"
        );
    }

    #[test]
    fn test_list_category() {
        let (temp_dir, vault) = vault();
        fs::create_dir_all(temp_dir.path().join("Projects").join("Alpha")).unwrap();
        fs::write(temp_dir.path().join("Projects").join("b.md"), "").unwrap();
        fs::write(temp_dir.path().join("Projects").join("Alpha").join("a.md"), "").unwrap();

        let files = list_category(&vault, &configured(), Category::Project).unwrap();
        assert_eq!(files, vec!["Projects/Alpha/a.md", "Projects/b.md"]);

        let empty = list_category(&vault, &configured(), Category::Area).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err = FilerError::MissingConfiguration {
            category: Category::Archive,
        };
        assert!(err.to_string().contains("archivesFolder"));

        let err = FilerError::NotArchivable {
            path: "loose.md".to_string(),
            classification: Classification::Unclassified,
        };
        assert!(err.to_string().contains("not in a PARA folder"));
    }
}
