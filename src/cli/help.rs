use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::output;

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for definition in registry.iter() {
        output::info(format!("  {:<10} {}", definition.name, definition.description));
    }
    output::info("Use `help <command>` for details.");
}

pub fn print_command(definition: &CommandDefinition) {
    output::section(format!("Help: {}", definition.name));
    output::info(format!("  Description: {}", definition.description));
    output::info(format!("  Usage: {}", definition.usage));
}
