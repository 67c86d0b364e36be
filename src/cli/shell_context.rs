//! Shell state, command dispatch and error reporting.

use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use strsim::levenshtein;
use thiserror::Error;

use sales_config::{app_data_dir, Config, ConfigError, ConfigManager};
use sales_core::{
    Clock, CoreError, ListView, SaleForm, SalesBook, SystemClock, ValidationError, ViewAction,
    ViewState,
};
use sales_domain::{format_sale_date, SaleRecord};
use sales_storage_json::{JsonFileStore, StoragePaths};

use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Fatal errors that stop the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Per-command failures, reported and then the shell keeps going.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Core(CoreError::Validation(err))
    }
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) registry: CommandRegistry,
    config: Config,
    config_manager: ConfigManager,
    store: Arc<JsonFileStore>,
    book: SalesBook,
    view: ViewState,
    clock: Arc<dyn Clock>,
    data_changed: Arc<AtomicBool>,
    theme: ColorfulTheme,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Opens the config and sale store found under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let data_root = config.resolve_data_root(&base);
        let store = Arc::new(JsonFileStore::with_retention(
            StoragePaths::under(&data_root),
            config.backup_retention,
        )?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let data_changed = Arc::new(AtomicBool::new(false));
        let mut book = SalesBook::new(store.clone(), config.store_key.clone(), clock.clone());
        let flag = Arc::clone(&data_changed);
        book.subscribe(move |records| {
            tracing::debug!(count = records.len(), "sales changed");
            flag.store(true, Ordering::SeqCst);
        });
        book.reload();

        tracing::info!(data_root = %data_root.display(), mode = ?mode, "shell ready");

        Ok(Self {
            mode,
            running: true,
            registry: CommandRegistry::new(commands::all_definitions()),
            view: ViewState::new(clock.today()),
            config,
            config_manager,
            store,
            book,
            clock,
            data_changed,
            theme: ColorfulTheme::default(),
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        if self.view.search_active() {
            format!("sales [search: {}]> ", self.view.search_query())
        } else if self.view.date_filter_active() {
            format!(
                "sales [date: {}]> ",
                format_sale_date(self.view.selected_date())
            )
        } else {
            "sales> ".to_string()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        self.config_manager.config_path()
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub fn book(&self) -> &SalesBook {
        &self.book
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn apply_view(&mut self, action: ViewAction) {
        self.view.dispatch(action);
    }

    /// Reloads the stored list and projects it through the current filters.
    pub(crate) fn current_listing(&mut self) -> ListView {
        let records = self.book.reload();
        self.view.project(records)
    }

    pub(crate) fn reload_records(&mut self) -> &[SaleRecord] {
        self.book.reload()
    }

    pub(crate) fn submit(
        &mut self,
        form: &SaleForm,
        editing_id: Option<&str>,
    ) -> Result<SaleRecord, CommandError> {
        Ok(self.book.submit(form, editing_id)?)
    }

    /// Overwrites the stored list through the book's write gate; returns the new count.
    pub(crate) fn replace_records(
        &mut self,
        records: Vec<SaleRecord>,
    ) -> Result<usize, CommandError> {
        Ok(self.book.replace_all(records)?.len())
    }

    /// True once per confirmed save since the last call.
    pub(crate) fn take_data_changed(&self) -> bool {
        self.data_changed.swap(false, Ordering::SeqCst)
    }

    /// Prompts each form field in turn, pre-filled with `initial`.
    pub(crate) fn prompt_form(&self, initial: &SaleForm) -> Result<SaleForm, CommandError> {
        let item = self.prompt_field("Item", &initial.item)?;
        let quantity = self.prompt_field("Quantity", &initial.quantity)?;
        let price = self.prompt_field("Price", &initial.price)?;
        let date = self.prompt_field("Date (DD/MM/YYYY)", &initial.date)?;
        Ok(SaleForm::new(item, quantity, price, date))
    }

    pub(crate) fn prompt_field(&self, label: &str, initial: &str) -> Result<String, CommandError> {
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|definition| definition.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_command(self.registry.names(), input) {
            output::hint(format!("Did you mean `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::Validation(err)) => {
                output::error(err);
            }
            CommandError::Core(CoreError::WriteInProgress) => {
                output::warning("Another save is still running. Try again in a moment.");
            }
            CommandError::Core(err @ CoreError::Persistence(_)) => {
                output::error(format!("Sale not saved: {err}"));
                output::hint("Nothing was changed. Check the data directory and retry.");
            }
            other => output::error(other),
        }
        Ok(())
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }
}

/// Closest command name within an edit distance of three.
pub(crate) fn closest_command<'a>(
    names: impl Iterator<Item = &'a str>,
    input: &str,
) -> Option<&'a str> {
    let input = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &input), name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}
