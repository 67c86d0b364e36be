use sales_core::{total_amount, SummaryService, TOP_N};

use super::CommandDefinition;
use crate::cli::output;
use crate::cli::render;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "charts",
            "Top items by quantity and revenue, plus monthly revenue",
            "charts [--json]",
            cmd_charts,
        ),
        CommandDefinition::new("total", "Show total revenue", "total", cmd_total),
    ]
}

fn cmd_charts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_json = match args {
        [] => false,
        ["--json"] => true,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: charts [--json]".into(),
            ))
        }
    };

    let snapshot = SummaryService::charts(context.reload_records(), TOP_N);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    output::section("Charts");
    if snapshot.is_empty() {
        output::info("No sales recorded yet. Charts appear after the first sale.");
        return Ok(());
    }
    output::lines(&render::charts(&snapshot, context.config()));
    Ok(())
}

fn cmd_total(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let total = total_amount(context.reload_records());
    output::info(format!(
        "Total sales: {}",
        context.config().format_amount(total)
    ));
    Ok(())
}
