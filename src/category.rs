/// PARA categories and their fixed lookup order.
///
/// Every managed note belongs to at most one of the four categories. The
/// category a note belongs to is never stored on the note itself: it is derived
/// from the configured folder the note lives under.
///
/// # Examples
///
/// ```
/// use parafile::category::Category;
///
/// assert_eq!("project".parse::<Category>(), Ok(Category::Project));
/// assert_eq!("Archives".parse::<Category>(), Ok(Category::Archive));
/// assert_eq!(Category::Area.settings_key(), "areasFolder");
/// ```
use std::fmt;
use std::str::FromStr;

/// One of the four PARA categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Short-term efforts with a goal and a deadline.
    Project,
    /// Long-term responsibilities to maintain.
    Area,
    /// Topics of ongoing interest.
    Resource,
    /// Inactive items from the other three categories.
    Archive,
}

impl Category {
    /// Order in which configured folders are checked during classification.
    pub const LOOKUP_ORDER: [Category; 4] = [
        Category::Project,
        Category::Area,
        Category::Resource,
        Category::Archive,
    ];

    /// Order in which categories are offered by the "new item" picker.
    pub const PICKER_ORDER: [Category; 4] = [
        Category::Resource,
        Category::Project,
        Category::Area,
        Category::Archive,
    ];

    /// Returns the identifier used by commands and the category picker.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Area => "area",
            Category::Resource => "resource",
            Category::Archive => "archive",
        }
    }

    /// Returns the singular display label ("Project").
    pub fn label(&self) -> &'static str {
        match self {
            Category::Project => "Project",
            Category::Area => "Area",
            Category::Resource => "Resource",
            Category::Archive => "Archive",
        }
    }

    /// Returns the plural display label ("Projects").
    pub fn plural_label(&self) -> &'static str {
        match self {
            Category::Project => "Projects",
            Category::Area => "Areas",
            Category::Resource => "Resources",
            Category::Archive => "Archives",
        }
    }

    /// Returns the key of this category's folder in the persisted settings.
    pub fn settings_key(&self) -> &'static str {
        match self {
            Category::Project => "projectsFolder",
            Category::Area => "areasFolder",
            Category::Resource => "resourcesFolder",
            Category::Archive => "archivesFolder",
        }
    }

    /// Whether notes of this category may be sent to the archive.
    pub fn is_archivable(&self) -> bool {
        matches!(self, Category::Project | Category::Area)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when text does not name a PARA category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category '{}': expected project, area, resource or archive",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parses singular or plural names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "project" | "projects" => Ok(Category::Project),
            "area" | "areas" => Ok(Category::Area),
            "resource" | "resources" => Ok(Category::Resource),
            "archive" | "archives" => Ok(Category::Archive),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
