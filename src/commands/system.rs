use crate::command::{
    CommandCategory, CommandDef, CommandOutcome, CommandParam, CommandRegistry, Value,
};
use crate::state::AppState;

const CATEGORY: CommandCategory = CommandCategory::System;

/// Commands that need the registry or the alias store are answered by
/// [`crate::app::App::execute_line`]; this handler only runs when dispatched without it.
fn frontend_only(_state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    Err("only available from the command line".to_string())
}

fn clear(_state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    Ok(CommandOutcome::ClearOutput)
}

fn quit(_state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    Ok(CommandOutcome::Quit)
}

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandDef::new("help", CATEGORY, "Show help for a command", frontend_only)
            .aliases(&["h", "?"])
            .param(
                CommandParam::string("command", "Command name")
                    .optional(Value::Text(String::new())),
            ),
    );
    registry.register(
        CommandDef::new("list_commands", CATEGORY, "List commands by category", frontend_only)
            .aliases(&["lc"]),
    );
    registry.register(
        CommandDef::new("alias", CATEGORY, "Define a user alias", frontend_only)
            .long("alias <name> <command...>; with no arguments lists aliases.")
            .param(CommandParam::string("name", "Alias name").optional(Value::Text(String::new())))
            .param(
                CommandParam::string("command", "Command line the alias expands to")
                    .optional(Value::Text(String::new())),
            ),
    );
    registry.register(
        CommandDef::new("unalias", CATEGORY, "Remove a user alias", frontend_only)
            .param(CommandParam::string("name", "Alias name")),
    );
    registry.register(CommandDef::new("aliases", CATEGORY, "List user aliases", frontend_only));
    registry.register(CommandDef::new("clear", CATEGORY, "Clear CLI output", clear).aliases(&["cls"]));
    registry.register(
        CommandDef::new("quit", CATEGORY, "Exit tau", quit)
            .aliases(&["q", "exit"])
            .key("Q"),
    );
}
