/// File-tree access for the note vault.
///
/// The filer never touches the filesystem directly. It talks to a [`Vault`],
/// which addresses notes with vault-relative paths using `/` separators
/// (e.g. `"Projects/launch.md"`). [`FsVault`] backs a vault with a directory
/// on disk.
use glob::Pattern;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Normalizes a vault-relative path.
///
/// Backslashes become `/`, runs of slashes collapse, surrounding whitespace and
/// leading or trailing slashes are removed. An empty result denotes the vault
/// root.
///
/// ```
/// use parafile::vault::normalize_path;
///
/// assert_eq!(normalize_path("/Projects//Alpha/"), "Projects/Alpha");
/// assert_eq!(normalize_path("Areas\\Health\\log.md"), "Areas/Health/log.md");
/// assert_eq!(normalize_path(" / "), "");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.trim()
        .replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the final component of a vault path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Joins a folder and a name into a vault path.
pub fn join_path(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Errors reported by the vault.
#[derive(Debug)]
pub enum VaultError {
    /// No file or folder at the path.
    NotFound { path: String },
    /// Something already occupies the path.
    AlreadyExists { path: String },
    /// The path cannot be used (escapes the vault, not UTF-8, ...).
    InvalidPath { path: String, reason: String },
    /// The underlying filesystem call failed.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "{} does not exist", path),
            Self::AlreadyExists { path } => write!(f, "{} already exists", path),
            Self::InvalidPath { path, reason } => write!(f, "Invalid path '{}': {}", path, reason),
            Self::Io { path, source } => write!(f, "I/O error on {}: {}", path, source),
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// The host file tree as seen by the filer.
///
/// Each method is a single fallible call. Implementations must leave the
/// source untouched when `rename` fails.
pub trait Vault {
    /// True if a file or folder exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// True if a folder exists at `path`.
    fn is_folder(&self, path: &str) -> bool;

    /// True if a file (not a folder) exists at `path`.
    fn is_file(&self, path: &str) -> bool;

    /// Creates a folder and any missing parents.
    fn create_folder(&mut self, path: &str) -> VaultResult<()>;

    /// Creates a new file with `contents`. Fails if anything exists at `path`.
    fn create(&mut self, path: &str, contents: &str) -> VaultResult<()>;

    /// Reads a file as UTF-8 text.
    fn read(&self, path: &str) -> VaultResult<String>;

    /// Moves a file. Fails if the source is missing or the destination exists.
    fn rename(&mut self, from: &str, to: &str) -> VaultResult<()>;

    /// Lists files under `folder`, recursively, as sorted vault paths.
    fn list_files(&self, folder: &str) -> VaultResult<Vec<String>>;
}

/// A vault rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Opens the vault at `root`, which must be an existing directory.
    ///
    /// The root is canonicalized so listed paths can be made vault-relative.
    pub fn open(root: impl Into<PathBuf>) -> VaultResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultError::NotFound {
                path: root.display().to_string(),
            });
        }
        let root = fs::canonicalize(&root).map_err(|e| VaultError::Io {
            path: root.display().to_string(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// The directory backing this vault.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a vault path to a filesystem path.
    ///
    /// `.` and `..` segments are rejected so every path stays inside the root.
    pub fn resolve(&self, path: &str) -> VaultResult<PathBuf> {
        let normalized = normalize_path(path);
        if normalized
            .split('/')
            .any(|segment| segment == "." || segment == "..")
        {
            return Err(VaultError::InvalidPath {
                path: path.to_string(),
                reason: "relative segments are not allowed".to_string(),
            });
        }

        let mut resolved = self.root.clone();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            resolved.push(segment);
        }
        Ok(resolved)
    }

    fn io_error(path: &str, source: std::io::Error) -> VaultError {
        VaultError::Io {
            path: path.to_string(),
            source,
        }
    }
}

impl Vault for FsVault {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn is_folder(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn is_file(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn create_folder(&mut self, path: &str) -> VaultResult<()> {
        let target = self.resolve(path)?;
        if target.is_file() {
            return Err(VaultError::AlreadyExists {
                path: path.to_string(),
            });
        }
        fs::create_dir_all(&target).map_err(|e| Self::io_error(path, e))
    }

    fn create(&mut self, path: &str, contents: &str) -> VaultResult<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent()
            && !parent.is_dir()
        {
            return Err(VaultError::NotFound {
                path: normalize_path(path)
                    .rsplit_once('/')
                    .map(|(folder, _)| folder.to_string())
                    .unwrap_or_default(),
            });
        }

        // create_new refuses to clobber anything already at the path
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => VaultError::AlreadyExists {
                    path: path.to_string(),
                },
                _ => Self::io_error(path, e),
            })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| Self::io_error(path, e))
    }

    fn read(&self, path: &str) -> VaultResult<String> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(VaultError::NotFound {
                path: path.to_string(),
            });
        }
        fs::read_to_string(&target).map_err(|e| Self::io_error(path, e))
    }

    fn rename(&mut self, from: &str, to: &str) -> VaultResult<()> {
        let source = self.resolve(from)?;
        let destination = self.resolve(to)?;

        if !source.is_file() {
            return Err(VaultError::NotFound {
                path: from.to_string(),
            });
        }
        if destination.exists() {
            return Err(VaultError::AlreadyExists {
                path: to.to_string(),
            });
        }
        if let Some(parent) = destination.parent()
            && !parent.is_dir()
        {
            return Err(VaultError::NotFound {
                path: parent.display().to_string(),
            });
        }

        fs::rename(&source, &destination).map_err(|e| Self::io_error(from, e))
    }

    fn list_files(&self, folder: &str) -> VaultResult<Vec<String>> {
        let base = self.resolve(folder)?;
        if !base.is_dir() {
            return Err(VaultError::NotFound {
                path: folder.to_string(),
            });
        }

        let base_str = base.to_str().ok_or_else(|| VaultError::InvalidPath {
            path: folder.to_string(),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        let pattern = format!("{}/**/*", Pattern::escape(base_str));

        let entries = glob::glob(&pattern).map_err(|e| VaultError::InvalidPath {
            path: folder.to_string(),
            reason: e.to_string(),
        })?;

        // An unreadable subfolder fails the listing instead of hiding its notes
        self.collect_files(entries.map(|entry| {
            entry.map_err(|e| {
                let path = self.vault_path(e.path()).unwrap_or_else(|| folder.to_string());
                Self::io_error(&path, e.into_error())
            })
        }))
    }
}

impl FsVault {
    fn vault_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        Some(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    /// Keeps the files among `entries` as sorted vault paths, stopping at the first error.
    fn collect_files<I>(&self, entries: I) -> VaultResult<Vec<String>>
    where
        I: IntoIterator<Item = VaultResult<PathBuf>>,
    {
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.is_file() {
                continue;
            }
            if let Some(vault_path) = self.vault_path(&entry) {
                files.push(vault_path);
            }
        }
        files.sort();
        Ok(files)
    }
}
