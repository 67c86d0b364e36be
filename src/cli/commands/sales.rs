use sales_core::{SaleForm, ViewAction};
use sales_domain::format_sale_date;

use super::CommandDefinition;
use crate::cli::input::{apply_assignments, canonical_date, format_quantity, parse_date_arg};
use crate::cli::output;
use crate::cli::render;
use crate::cli::shell_context::{CliMode, CommandError, CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "list",
            "List sales grouped by date, or through the active filter",
            "list",
            cmd_list,
        ),
        CommandDefinition::new(
            "search",
            "Filter sales by item name; no text closes the search",
            "search [text...]",
            cmd_search,
        ),
        CommandDefinition::new(
            "date",
            "Show only the sales of one day",
            "date <DD/MM/YYYY|today>",
            cmd_date,
        ),
        CommandDefinition::new("clear", "Drop search and date filters", "clear", cmd_clear),
        CommandDefinition::new(
            "add",
            "Record a sale (date defaults to today)",
            "add <item> <quantity> <price> [date]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Change fields of an existing sale",
            "edit <id> [item=..] [quantity=..] [price=..] [date=..]",
            cmd_edit,
        ),
        CommandDefinition::new("show", "Show one sale", "show <id>", cmd_show),
    ]
}

pub(crate) fn print_listing(context: &mut ShellContext) {
    let listing = context.current_listing();
    if listing.is_empty() {
        if context.view().is_filtering() {
            output::info("No sales match the current filter.");
        } else {
            output::info("No sales recorded yet. Use `add` to record one.");
        }
        return;
    }
    output::lines(&render::list_view(&listing, context.config()));
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Sales");
    print_listing(context);
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        context.apply_view(ViewAction::CloseSearch);
        output::info("Search closed.");
        return Ok(());
    }
    context.apply_view(ViewAction::OpenSearch);
    context.apply_view(ViewAction::SetQuery(args.join(" ")));
    output::section(format!("Search: {}", context.view().search_query()));
    print_listing(context);
    Ok(())
}

fn cmd_date(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = match args.first() {
        Some(raw) => raw.to_string(),
        None if context.mode() == CliMode::Interactive => {
            context.apply_view(ViewAction::OpenDatePicker);
            let initial = format_sale_date(context.view().selected_date());
            match context.prompt_field("Date (DD/MM/YYYY)", &initial) {
                Ok(value) if !value.trim().is_empty() => value,
                Ok(_) => {
                    context.apply_view(ViewAction::DismissDatePicker);
                    return Ok(());
                }
                Err(err) => {
                    context.apply_view(ViewAction::DismissDatePicker);
                    return Err(err);
                }
            }
        }
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: date <DD/MM/YYYY|today>".into(),
            ))
        }
    };

    let day = match parse_date_arg(&raw, context.today()) {
        Ok(day) => day,
        Err(err) => {
            context.apply_view(ViewAction::DismissDatePicker);
            return Err(err);
        }
    };
    context.apply_view(ViewAction::PickDate(day));
    output::section(format!("Sales on {}", format_sale_date(day)));
    print_listing(context);
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.apply_view(ViewAction::ClearFilters);
    output::info("Filters cleared.");
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let form = match args.len() {
        0 if context.mode() == CliMode::Interactive => {
            let initial = SaleForm::new("", "", "", format_sale_date(today));
            let mut form = context.prompt_form(&initial)?;
            form.date = canonical_date(&form.date, today)?;
            form
        }
        3 | 4 => {
            let date = match args.get(3) {
                Some(raw) => canonical_date(raw, today)?,
                None => format_sale_date(today),
            };
            SaleForm::new(args[0], args[1], args[2], date)
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: add <item> <quantity> <price> [date]".into(),
            ))
        }
    };

    let record = context.submit(&form, None)?;
    output::success(format!(
        "Sale {} saved: {} x{} for {} on {}.",
        record.id,
        record.item,
        format_quantity(record.quantity),
        context.config().format_amount(record.amount),
        record.date
    ));
    refresh_after_save(context);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((id, assignments)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id> [item=..] [quantity=..] [price=..] [date=..]".into(),
        ));
    };
    let today = context.today();
    context.reload_records();
    let Some(existing) = context.book().record(id) else {
        return Err(CommandError::InvalidArguments(format!(
            "sale `{}` not found",
            id
        )));
    };

    let mut form = SaleForm::from_record(existing);
    if assignments.is_empty() {
        if context.mode() != CliMode::Interactive {
            return Err(CommandError::InvalidArguments(
                "edit needs at least one key=value in script mode".into(),
            ));
        }
        form = context.prompt_form(&form)?;
        form.date = canonical_date(&form.date, today)?;
    } else {
        apply_assignments(&mut form, assignments, today)?;
    }

    let record = context.submit(&form, Some(*id))?;
    output::success(format!("Sale {} updated.", record.id));
    output::lines(&render::sale_detail(&record, context.config()));
    refresh_after_save(context);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments("usage: show <id>".into()));
    };
    context.reload_records();
    let Some(record) = context.book().record(id) else {
        return Err(CommandError::InvalidArguments(format!(
            "sale `{}` not found",
            id
        )));
    };
    output::section(format!("Sale {}", record.id));
    output::lines(&render::sale_detail(record, context.config()));
    Ok(())
}

/// Re-renders the list once the book reports a confirmed save.
fn refresh_after_save(context: &mut ShellContext) {
    if context.take_data_changed() && context.mode() == CliMode::Interactive {
        output::section("Sales");
        print_listing(context);
    }
}
