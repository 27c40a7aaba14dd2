//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: notices, settings
//! tables and listings. Every line the binary prints goes through here.

use crate::commands::{CommandSpec, Notice, NoticeLevel};
use crate::views::Widget;
use colored::*;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Settings and command tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use parafile::output::OutputFormatter;
    /// OutputFormatter::success("Moved Projects/launch.md to Archives/launch.md");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a notice with the styling for its level, then its details.
    pub fn notice(notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => Self::success(&notice.message),
            NoticeLevel::Info => Self::info(&notice.message),
            NoticeLevel::Warning => Self::warning(&notice.message),
            NoticeLevel::Error => Self::error(&notice.message),
        }
        for line in &notice.details {
            Self::plain(&format!("  - {}", line));
        }
    }

    /// Prints the settings tab as an aligned table.
    ///
    /// Only text inputs are shown; unset folders are marked `(not set)`.
    pub fn settings_table(widgets: &[Widget]) {
        Self::header("PARA SETTINGS");

        let rows: Vec<(&str, &str, &str)> = widgets
            .iter()
            .filter_map(|widget| match widget {
                Widget::TextInput {
                    label,
                    description,
                    value,
                    ..
                } => Some((label.as_str(), description.as_str(), value.as_str())),
                _ => None,
            })
            .collect();

        let label_width = rows
            .iter()
            .map(|(label, _, _)| label.len())
            .max()
            .unwrap_or(0)
            .max(7); // At least "Setting" width

        println!(
            "{:<width$} | {}",
            "Setting".bold(),
            "Folder".bold(),
            width = label_width
        );
        println!("{}", "-".repeat(label_width + 20));

        for (label, description, value) in rows {
            let shown = if value.trim().is_empty() {
                "(not set)".dimmed().to_string()
            } else {
                value.green().to_string()
            };
            println!("{:<width$} | {}", label, shown, width = label_width);
            println!(
                "{:<width$} | {}",
                "",
                description.dimmed(),
                width = label_width
            );
        }
    }

    /// Prints the registered palette commands.
    pub fn command_list(commands: &[CommandSpec]) {
        Self::header("COMMANDS");
        let width = commands.iter().map(|c| c.id.len()).max().unwrap_or(0);
        for command in commands {
            println!("{:<width$}  {}", command.id.cyan(), command.name, width = width);
        }
    }
}
