use super::{index, text};
use crate::command::{
    CommandCategory, CommandDef, CommandOutcome, CommandParam, CommandRegistry, Value,
};
use crate::layout::LayoutConfig;
use crate::state::{AppState, DisplayMode};

const CATEGORY: CommandCategory = CommandCategory::View;

fn toggle_mode(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.display = state.display.toggled();
    Ok(CommandOutcome::Message(format!("display mode: {}", state.display)))
}

fn display_mode(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let name = text(args, 0)?;
    state.display =
        DisplayMode::from_name(&name).ok_or_else(|| format!("unknown display mode: {name}"))?;
    Ok(CommandOutcome::Message(format!("display mode: {}", state.display)))
}

fn show_layout(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    let mut lines = vec!["Layout:".to_string()];
    lines.extend(state.layout.describe().into_iter().map(|line| format!("  {line}")));
    Ok(CommandOutcome::Lines(lines))
}

fn layout_set(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let key = text(args, 0)?;
    let value = u16::try_from(index(args, 1)?).map_err(|_| "value too large".to_string())?;
    state.layout = state.layout.with_override(&key, value)?;
    Ok(CommandOutcome::Message(format!("layout {key} = {value}")))
}

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandDef::new("toggle_mode", CATEGORY, "Toggle envelope/points display", toggle_mode)
            .key("o"),
    );
    registry.register(
        CommandDef::new("display_mode", CATEGORY, "Set display mode", display_mode)
            .aliases(&["mode"])
            .param(CommandParam::choice(
                "mode",
                "Rendering style",
                &["envelope", "points"],
            )),
    );
    registry.register(CommandDef::new(
        "layout",
        CATEGORY,
        "Show layout configuration",
        show_layout,
    ));
    registry.register(
        CommandDef::new("layout_set", CATEGORY, "Change a layout setting", layout_set)
            .long("Builds a new layout configuration; the next frame uses it.")
            .param(CommandParam::choice(
                "key",
                "Layout setting",
                &LayoutConfig::KEYS,
            ))
            .param(CommandParam::int("value", "New value in rows/columns").range(0.0, 500.0)),
    );
}
