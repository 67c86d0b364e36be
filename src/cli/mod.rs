//! Terminal front end: an interactive rustyline shell, or a script mode reading
//! one command per stdin line when `SALES_TRACKER_CLI_SCRIPT` is set.

pub mod commands;
mod help;
pub mod input;
pub mod output;
pub mod render;
mod shell;
pub mod shell_context;

pub use shell::run_cli;
pub use shell_context::{CliError, CliMode, CommandError, ShellContext};
