//! The PARA settings record.
//!
//! Settings hold one folder path per category. Every field defaults to the
//! empty string, which means "not configured". The record is persisted as a
//! flat JSON object:
//!
//! ```json
//! {
//!   "projectsFolder": "Projects",
//!   "areasFolder": "Areas",
//!   "resourcesFolder": "Resources",
//!   "archivesFolder": "Archives"
//! }
//! ```

use crate::category::Category;
use crate::vault::normalize_path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Folder paths for the four PARA categories.
///
/// Paths are vault-relative. They are not validated against the vault: a
/// configured folder may not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParaSettings {
    pub projects_folder: String,
    pub areas_folder: String,
    pub resources_folder: String,
    pub archives_folder: String,
}

impl ParaSettings {
    /// Returns the raw configured value for a category, possibly empty.
    pub fn raw_folder(&self, category: Category) -> &str {
        match category {
            Category::Project => &self.projects_folder,
            Category::Area => &self.areas_folder,
            Category::Resource => &self.resources_folder,
            Category::Archive => &self.archives_folder,
        }
    }

    /// Returns the normalized folder for a category, or `None` when unset.
    ///
    /// A value consisting only of whitespace or slashes counts as unset.
    ///
    /// ```
    /// use parafile::category::Category;
    /// use parafile::settings::ParaSettings;
    ///
    /// let settings = ParaSettings {
    ///     archives_folder: "/Archives/".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(settings.folder(Category::Archive).as_deref(), Some("Archives"));
    /// assert_eq!(settings.folder(Category::Project), None);
    /// ```
    pub fn folder(&self, category: Category) -> Option<String> {
        let normalized = normalize_path(self.raw_folder(category));
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }

    /// Sets the folder for a category, storing the value as given.
    pub fn set_folder(&mut self, category: Category, value: impl Into<String>) {
        let value = value.into();
        match category {
            Category::Project => self.projects_folder = value,
            Category::Area => self.areas_folder = value,
            Category::Resource => self.resources_folder = value,
            Category::Archive => self.archives_folder = value,
        }
    }

    /// Sets a single named field.
    pub fn set(&mut self, field: SettingsField, value: impl Into<String>) {
        self.set_folder(field.category(), value);
    }

    /// True when no category has a folder configured.
    pub fn is_unconfigured(&self) -> bool {
        Category::LOOKUP_ORDER
            .iter()
            .all(|category| self.folder(*category).is_none())
    }

    /// Builds settings from a stored JSON value, field by field over defaults.
    ///
    /// Known keys holding strings override the default. Missing keys, unknown
    /// keys and keys holding any other JSON type are ignored. A value that is
    /// not an object yields the defaults and reports why.
    pub fn merge_over_defaults(stored: &Value) -> (Self, Option<String>) {
        let mut settings = Self::default();
        let Some(object) = stored.as_object() else {
            return (
                settings,
                Some(format!("expected a JSON object, found {}", json_kind(stored))),
            );
        };

        let mut ignored = Vec::new();
        for field in SettingsField::ALL {
            match object.get(field.key()) {
                Some(Value::String(value)) => settings.set(field, value.clone()),
                Some(Value::Null) | None => {}
                Some(other) => ignored.push(format!("{} ({})", field.key(), json_kind(other))),
            }
        }

        let problem = if ignored.is_empty() {
            None
        } else {
            Some(format!("ignored non-string fields: {}", ignored.join(", ")))
        };
        (settings, problem)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A named settings field, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    ProjectsFolder,
    AreasFolder,
    ResourcesFolder,
    ArchivesFolder,
}

impl SettingsField {
    /// All fields, in settings-tab order.
    pub const ALL: [SettingsField; 4] = [
        SettingsField::ProjectsFolder,
        SettingsField::AreasFolder,
        SettingsField::ResourcesFolder,
        SettingsField::ArchivesFolder,
    ];

    /// The category this field configures.
    pub fn category(&self) -> Category {
        match self {
            SettingsField::ProjectsFolder => Category::Project,
            SettingsField::AreasFolder => Category::Area,
            SettingsField::ResourcesFolder => Category::Resource,
            SettingsField::ArchivesFolder => Category::Archive,
        }
    }

    /// The field configuring a category.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Project => SettingsField::ProjectsFolder,
            Category::Area => SettingsField::AreasFolder,
            Category::Resource => SettingsField::ResourcesFolder,
            Category::Archive => SettingsField::ArchivesFolder,
        }
    }

    /// The persisted key ("areasFolder").
    pub fn key(&self) -> &'static str {
        self.category().settings_key()
    }

    /// The settings-tab label ("Areas Folder").
    pub fn label(&self) -> String {
        format!("{} Folder", self.category().plural_label())
    }

    /// The settings-tab description ("Path for the Areas folder").
    pub fn description(&self) -> String {
        format!("Path for the {} folder", self.category().plural_label())
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors raised while addressing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The name matches neither a settings key nor a category.
    UnknownField(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownField(name) => write!(
                f,
                "Unknown settings field '{}': expected projectsFolder, areasFolder, resourcesFolder or archivesFolder",
                name
            ),
        }
    }
}

impl std::error::Error for SettingsError {}

impl FromStr for SettingsField {
    type Err = SettingsError;

    /// Accepts the persisted key (any case) or a category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(field) = SettingsField::ALL
            .iter()
            .find(|field| field.key().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*field);
        }
        trimmed
            .parse::<Category>()
            .map(SettingsField::for_category)
            .map_err(|_| SettingsError::UnknownField(s.to_string()))
    }
}
