use super::CommandDefinition;
use crate::cli::help;
use crate::cli::output;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "config",
            "Show or change preferences",
            "config [set <currency|decimal-comma> <value>]",
            cmd_config,
        ),
        CommandDefinition::new(
            "backups",
            "List saved copies of the sale store",
            "backups",
            cmd_backups,
        ),
        CommandDefinition::new(
            "restore",
            "Restore the sale store from a backup",
            "restore <number>",
            cmd_restore,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let config = context.config();
            output::section("Configuration");
            output::info(format!("  Currency      : {}", config.currency_symbol));
            output::info(format!("  Decimal comma : {}", config.decimal_comma));
            output::info(format!("  Store key     : {}", config.store_key));
            output::info(format!("  Backups kept  : {}", config.backup_retention));
            output::info(format!("  Config file   : {}", context.config_path().display()));
            Ok(())
        }
        ["set", key, value] => {
            set_config_value(context, key, value)?;
            context.persist_config()?;
            output::success(format!("Config `{}` updated.", key));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <currency|decimal-comma> <value>]".into(),
        )),
    }
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let config = context.config_mut();
    match key.to_lowercase().as_str() {
        "currency" => config.currency_symbol = value.to_string(),
        "decimal-comma" => {
            config.decimal_comma = parse_flag(value).ok_or_else(|| {
                CommandError::InvalidArguments("decimal-comma expects on or off".into())
            })?
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }
    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let key = context.config().store_key.clone();
    let backups = context.store().list_backups(&key)?;
    output::section("Backups");
    if backups.is_empty() {
        output::info("No backups yet. One is taken before every save.");
        return Ok(());
    }
    for (idx, backup) in backups.iter().enumerate() {
        let created = backup
            .created_at
            .map(|at| at.format("%d/%m/%Y %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        output::info(format!("  {:>2}. {}  ({})", idx + 1, created, backup.id));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments("usage: restore <number>".into()));
    };
    let key = context.config().store_key.clone();
    let backups = context.store().list_backups(&key)?;
    let backup = raw
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|idx| backups.get(idx))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "no backup numbered `{}`; see `backups`",
                raw
            ))
        })?;

    let records = context.store().read_backup(backup)?;
    let count = context.replace_records(records)?;
    tracing::info!(backup = %backup.id, count, "store restored from backup");
    output::success(format!("Restored {} ({} sales).", backup.id, count));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Sales Tracker {}", meta.version));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(definition) => help::print_command(definition),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
