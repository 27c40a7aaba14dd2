use clap::{Parser, Subcommand};
use parafile::category::Category;
use parafile::commands::{self, COMMANDS, Notice, ParaCommand, TemplateSource};
use parafile::config::AppConfig;
use parafile::output::OutputFormatter;
use parafile::settings::SettingsField;
use parafile::store::SettingsStore;
use parafile::vault::FsVault;
use parafile::views::{CreateParaModal, SettingsTab, View};
use std::path::PathBuf;
use std::process::ExitCode;

/// Organize notes into PARA folders: Projects, Areas, Resources, Archives.
#[derive(Debug, Parser)]
#[command(name = "parafile", version, about)]
struct Cli {
    /// Vault root directory (overrides the config file).
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Host configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new PARA item.
    New {
        /// project, area, resource or archive.
        category: Category,
        /// File name of the new item; `.md` is added when missing.
        name: String,
        /// Vault path of a template note.
        #[arg(long)]
        template: Option<String>,
    },
    /// Send a project or area note to the archive.
    Archive {
        /// Vault path of the note.
        file: String,
    },
    /// Move a note into a category folder.
    Move { file: String, category: Category },
    /// Show which category a note belongs to.
    Classify { file: String },
    /// List the notes in a category folder.
    List { category: Category },
    /// Show the configured folders.
    Settings,
    /// Set a category folder (e.g. `set areasFolder Areas`).
    Set {
        field: SettingsField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// List the registered palette commands.
    Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(notice) => {
            OutputFormatter::notice(&notice);
            if notice.is_failure() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Notice, String> {
    // Listing commands needs neither a vault nor settings
    if let Command::Commands = cli.command {
        return Ok(list_commands());
    }

    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let vault_root = config.vault_root(cli.vault.as_deref());
    let mut vault = FsVault::open(&vault_root)
        .map_err(|e| format!("Error opening vault {}: {}", vault_root.display(), e))?;
    let mut store = SettingsStore::open(config.settings_storage(vault.root()));

    let notice = match cli.command {
        Command::New {
            category,
            name,
            template,
        } => {
            let mut modal = CreateParaModal::new();
            modal.open();
            modal.select(category);
            modal.set_name(name);
            modal.set_template(
                template
                    .or_else(|| config.default_template.clone())
                    .map(TemplateSource::VaultFile),
            );
            modal.submit(&mut store, &mut vault)
        }
        Command::Archive { file } => {
            commands::run_command(ParaCommand::SendToArchive { file }, &mut store, &mut vault)
        }
        Command::Move { file, category } => commands::run_command(
            ParaCommand::MoveTo { file, category },
            &mut store,
            &mut vault,
        ),
        Command::Classify { file } => {
            commands::run_command(ParaCommand::Classify { file }, &mut store, &mut vault)
        }
        Command::List { category } => {
            commands::run_command(ParaCommand::List { category }, &mut store, &mut vault)
        }
        Command::Settings => {
            let mut tab = SettingsTab::new();
            tab.display(&store);
            tab.open();
            OutputFormatter::settings_table(&tab.render());
            tab.close();
            Notice::info(format!("Settings stored in {}", store.storage().path().display()))
        }
        Command::Set { field, value } => {
            let mut tab = SettingsTab::new();
            tab.open();
            tab.on_change(&mut store, &mut vault, field, &value)
        }
        Command::Commands => list_commands(),
    };

    Ok(notice)
}

fn list_commands() -> Notice {
    OutputFormatter::command_list(&COMMANDS);
    Notice::info(format!("{} commands registered", COMMANDS.len()))
}
