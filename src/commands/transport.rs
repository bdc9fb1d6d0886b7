use super::number;
use crate::command::{
    CommandCategory, CommandDef, CommandOutcome, CommandParam, CommandRegistry, Value,
};
use crate::state::AppState;

const CATEGORY: CommandCategory = CommandCategory::Transport;

fn position(state: &AppState) -> CommandOutcome {
    CommandOutcome::Message(format!("position {:.3}s", state.transport.position))
}

fn play(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.playing = true;
    Ok(CommandOutcome::message("\u{25b6} playing"))
}

fn stop(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.playing = false;
    Ok(CommandOutcome::message("\u{25a0} stopped"))
}

fn toggle_play(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    if state.transport.toggle_play() {
        Ok(CommandOutcome::message("\u{25b6} playing"))
    } else {
        Ok(CommandOutcome::message("\u{25a0} paused"))
    }
}

fn seek(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.seek(number(args, 0)?);
    Ok(position(state))
}

fn scrub(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.scrub(number(args, 0)?);
    Ok(position(state))
}

fn scrub_pct(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.scrub_pct(number(args, 0)?);
    Ok(position(state))
}

fn home(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.home();
    Ok(position(state))
}

fn end(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.end();
    Ok(position(state))
}

fn span(state: &AppState) -> CommandOutcome {
    CommandOutcome::Message(format!("span {:.3}s", state.transport.span))
}

fn zoom(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.zoom(number(args, 0)?);
    Ok(span(state))
}

fn zoom_in(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.zoom_in();
    Ok(span(state))
}

fn zoom_out(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.transport.zoom_out();
    Ok(span(state))
}

fn status(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    Ok(CommandOutcome::Message(state.status_line()))
}

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandDef::new("play", CATEGORY, "Start playback", play)
            .long("Begin transport playback from the current position."),
    );
    registry.register(CommandDef::new("stop", CATEGORY, "Stop playback", stop));
    registry.register(
        CommandDef::new("toggle_play", CATEGORY, "Toggle play/pause", toggle_play)
            .aliases(&["pause"])
            .key("Space"),
    );
    registry.register(
        CommandDef::new("seek", CATEGORY, "Seek to absolute time position", seek)
            .param(CommandParam::float("time", "Time in seconds (10ms, 1.5s, ...)").at_least(0.0)),
    );
    registry.register(
        CommandDef::new("scrub", CATEGORY, "Scrub by relative delta", scrub).param(
            CommandParam::float("delta", "Time delta in seconds (can be negative)"),
        ),
    );
    registry.register(
        CommandDef::new("scrub_pct", CATEGORY, "Scrub by percentage of duration", scrub_pct)
            .param(
                CommandParam::float("percent", "Percentage to scrub (-100 to 100)")
                    .range(-100.0, 100.0),
            )
            .key("Left/Right"),
    );
    registry.register(
        CommandDef::new("home", CATEGORY, "Jump to start of timeline", home)
            .aliases(&["start", "rewind", "rw"])
            .key("Home"),
    );
    registry.register(
        CommandDef::new("end", CATEGORY, "Jump to end of timeline", end)
            .aliases(&["finish", "ff"])
            .key("End"),
    );
    registry.register(
        CommandDef::new("zoom", CATEGORY, "Set visible time span", zoom)
            .param(CommandParam::float("span", "Span in seconds").at_least(0.01)),
    );
    registry.register(
        CommandDef::new("zoom_in", CATEGORY, "Zoom in (span / 1.25)", zoom_in)
            .aliases(&["zi"])
            .key("<"),
    );
    registry.register(
        CommandDef::new("zoom_out", CATEGORY, "Zoom out (span x 1.25)", zoom_out)
            .aliases(&["zo"])
            .key(">"),
    );
    registry.register(CommandDef::new(
        "status",
        CATEGORY,
        "Show transport position and span",
        status,
    ));
}
