use super::text;
use crate::command::{
    CommandCategory, CommandDef, CommandOutcome, CommandParam, CommandRegistry, Value,
};
use crate::state::AppState;

const CATEGORY: CommandCategory = CommandCategory::Markers;

fn label_completions(state: &AppState, index: usize, partial: &str) -> Vec<String> {
    if index != 0 {
        return Vec::new();
    }
    state
        .markers
        .labels()
        .into_iter()
        .filter(|label| label.starts_with(partial))
        .collect()
}

fn mark(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let label = text(args, 0)?;
    let time = args
        .get(1)
        .and_then(Value::as_f64)
        .unwrap_or(state.transport.position);
    let marker = state.markers.add(&label, time)?;
    let message = format!("marker '{}' at {:.3}s", marker.label, marker.time);
    state.lanes.add_event(message.clone());
    Ok(CommandOutcome::Message(message))
}

fn goto(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let label = text(args, 0)?;
    let time = state
        .markers
        .get(&label)
        .map(|marker| marker.time)
        .ok_or_else(|| format!("no marker: {label}"))?;
    state.transport.seek(time);
    Ok(CommandOutcome::Message(format!("\u{2192} {label} ({time:.3}s)")))
}

fn next_marker(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    let (label, time) = state
        .markers
        .next_after(state.transport.position)
        .map(|m| (m.label.clone(), m.time))
        .ok_or_else(|| "no next marker".to_string())?;
    state.transport.seek(time);
    Ok(CommandOutcome::Message(format!("\u{2192} {label} ({time:.3}s)")))
}

fn prev_marker(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    let (label, time) = state
        .markers
        .prev_before(state.transport.position)
        .map(|m| (m.label.clone(), m.time))
        .ok_or_else(|| "no previous marker".to_string())?;
    state.transport.seek(time);
    Ok(CommandOutcome::Message(format!("\u{2190} {label} ({time:.3}s)")))
}

fn list(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    if state.markers.is_empty() {
        return Ok(CommandOutcome::message("no markers"));
    }
    let mut lines = vec![format!("Markers ({}):", state.markers.len())];
    lines.extend(
        state
            .markers
            .iter()
            .map(|m| format!("  {:>9.3}s  {}", m.time, m.label)),
    );
    Ok(CommandOutcome::Lines(lines))
}

fn delete(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let label = text(args, 0)?;
    if state.markers.remove(&label) {
        Ok(CommandOutcome::Message(format!("deleted marker '{label}'")))
    } else {
        Err(format!("no marker: {label}"))
    }
}

fn label_param() -> CommandParam {
    CommandParam::string("label", "Marker label")
}

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandDef::new("mark", CATEGORY, "Create marker at current position or given time", mark)
            .param(label_param())
            .param(
                CommandParam::float("time", "Time in seconds (default: current position)")
                    .at_least(0.0)
                    .optional(Value::Text("now".to_string())),
            )
            .key("m"),
    );
    registry.register(
        CommandDef::new("goto", CATEGORY, "Jump to marker by label", goto)
            .aliases(&["goto_marker"])
            .param(label_param())
            .completer(label_completions),
    );
    registry.register(
        CommandDef::new("next_marker", CATEGORY, "Jump to next marker", next_marker)
            .aliases(&["nm"])
            .key("`"),
    );
    registry.register(
        CommandDef::new("prev_marker", CATEGORY, "Jump to previous marker", prev_marker)
            .aliases(&["pm"])
            .key("~"),
    );
    registry.register(
        CommandDef::new("list_markers", CATEGORY, "List all markers", list)
            .aliases(&["lm", "markers"]),
    );
    registry.register(
        CommandDef::new("del_marker", CATEGORY, "Delete marker by label", delete)
            .aliases(&["dm"])
            .param(label_param())
            .completer(label_completions),
    );
}
