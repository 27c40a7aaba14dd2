//! Host-facing dialogs.
//!
//! The host drives each view through [`View`]: it opens it, asks it to render,
//! forwards user input to the view's handlers and closes it. Rendering produces
//! a list of [`Widget`]s; how those are drawn is up to the host.

use crate::category::Category;
use crate::commands::{self, Notice, ParaCommand, TemplateSource};
use crate::settings::{ParaSettings, SettingsField};
use crate::store::{SettingsStorage, SettingsStore};
use crate::vault::Vault;

/// One element of a rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Heading(String),
    /// A settings text input bound to a field.
    TextInput {
        field: SettingsField,
        label: String,
        description: String,
        value: String,
    },
    /// A free-form text field.
    TextField { label: String, value: String },
    /// A drop-down of `(value, label)` options.
    Select {
        options: Vec<(String, String)>,
        selected: String,
    },
    Button(String),
}

/// A dialog the host can open, render and close.
pub trait View {
    fn open(&mut self);
    fn close(&mut self);
    fn is_open(&self) -> bool;
    /// The widgets to show. A closed view renders nothing.
    fn render(&self) -> Vec<Widget>;
}

/// The settings panel: one text input per category folder.
#[derive(Debug, Clone, Default)]
pub struct SettingsTab {
    open: bool,
    values: ParaSettings,
}

impl SettingsTab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the displayed values from the store.
    pub fn display<S: SettingsStorage>(&mut self, store: &SettingsStore<S>) {
        self.values = store.settings().clone();
    }

    /// Change handler for a text input: updates the field and saves.
    pub fn on_change<S: SettingsStorage, V: Vault + ?Sized>(
        &mut self,
        store: &mut SettingsStore<S>,
        vault: &mut V,
        field: SettingsField,
        value: &str,
    ) -> Notice {
        let notice = commands::run_command(
            ParaCommand::SetFolder {
                field,
                value: value.to_string(),
            },
            store,
            vault,
        );
        self.display(store);
        notice
    }
}

impl View for SettingsTab {
    fn open(&mut self) {
        self.open = true;
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn render(&self) -> Vec<Widget> {
        if !self.open {
            return Vec::new();
        }
        SettingsField::ALL
            .iter()
            .map(|field| Widget::TextInput {
                field: *field,
                label: field.label(),
                description: field.description(),
                value: self.values.raw_folder(field.category()).to_string(),
            })
            .collect()
    }
}

/// The "new PARA item" dialog: pick a category, name the item, submit.
#[derive(Debug, Clone)]
pub struct CreateParaModal {
    open: bool,
    category: Category,
    name: String,
    template: Option<TemplateSource>,
}

impl Default for CreateParaModal {
    fn default() -> Self {
        Self {
            open: false,
            category: Category::PICKER_ORDER[0],
            name: String::new(),
            template: None,
        }
    }
}

impl CreateParaModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_template(&mut self, template: Option<TemplateSource>) {
        self.template = template;
    }

    pub fn selected(&self) -> Category {
        self.category
    }

    /// Creates the item. The dialog closes on success and stays open otherwise.
    pub fn submit<S: SettingsStorage, V: Vault + ?Sized>(
        &mut self,
        store: &mut SettingsStore<S>,
        vault: &mut V,
    ) -> Notice {
        let notice = commands::run_command(
            ParaCommand::CreateNew {
                category: self.category,
                name: self.name.clone(),
                template: self.template.clone(),
            },
            store,
            vault,
        );
        if !notice.is_failure() {
            self.close();
        }
        notice
    }
}

impl View for CreateParaModal {
    fn open(&mut self) {
        self.open = true;
    }

    fn close(&mut self) {
        self.open = false;
        self.name.clear();
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn render(&self) -> Vec<Widget> {
        if !self.open {
            return Vec::new();
        }
        vec![
            Widget::Heading("Choose the type to add".to_string()),
            Widget::Select {
                options: Category::PICKER_ORDER
                    .iter()
                    .map(|c| (c.id().to_string(), c.label().to_string()))
                    .collect(),
                selected: self.category.id().to_string(),
            },
            Widget::TextField {
                label: "Name".to_string(),
                value: self.name.clone(),
            },
            Widget::Button("Create".to_string()),
            Widget::Button("Cancel".to_string()),
        ]
    }
}
