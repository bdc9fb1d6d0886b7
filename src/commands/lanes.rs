use super::{index, number};
use crate::command::{
    CommandCategory, CommandDef, CommandOutcome, CommandParam, CommandRegistry, Value,
};
use crate::state::{AppState, LANE_COUNT, MAX_FULL_HEIGHT};

const CATEGORY: CommandCategory = CommandCategory::Lanes;

fn lane_param() -> CommandParam {
    CommandParam::int("lane", "Lane number (0=logs, 1-8=data, 9=events)")
        .range(0.0, (LANE_COUNT - 1) as f64)
        .with_completions(&["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"])
}

fn lane_toggle(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    state
        .lanes
        .toggle_visibility(index(args, 0)?)
        .map(CommandOutcome::Message)
}

fn lane_mode(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    state.lanes.cycle_mode(index(args, 0)?).map(CommandOutcome::Message)
}

fn lane_height(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let lane = index(args, 0)?;
    let height = u16::try_from(index(args, 1)?).unwrap_or(u16::MAX);
    state
        .lanes
        .set_full_height(lane, height)
        .map(CommandOutcome::Message)
}

fn lane_gain(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let lane = index(args, 0)?;
    apply_gain(state, lane, args.get(1..).unwrap_or(&[]))
}

/// `ch0`..`ch3` map onto data lanes 1..4; bare numbers name a lane directly.
fn resolve_target(value: &Value) -> Result<usize, String> {
    match value {
        Value::Channel(id) => Ok(usize::from(*id) + 1),
        other => {
            let text = other.as_text();
            text.parse::<usize>()
                .ok()
                .filter(|lane| *lane < LANE_COUNT)
                .ok_or_else(|| format!("unknown gain target: {text} (use ch0-ch3 or a lane 0-9)"))
        }
    }
}

fn apply_gain(state: &mut AppState, lane: usize, args: &[Value]) -> Result<CommandOutcome, String> {
    let gain = match args.first() {
        Some(Value::Multiplier(factor)) => state.lanes.multiply_gain(lane, *factor)?,
        _ => state.lanes.set_gain(lane, number(args, 0)?)?,
    };
    Ok(CommandOutcome::Message(format!("Lane {lane} gain {gain:.3}")))
}

fn gain(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let target = args
        .first()
        .ok_or_else(|| "missing gain target".to_string())?;
    let lane = resolve_target(target)?;
    apply_gain(state, lane, args.get(1..).unwrap_or(&[]))
}

fn list(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    let mut lines = vec!["Lanes:".to_string()];
    for lane in state.lanes.iter() {
        let marker = if lane.id == state.lanes.current { "*" } else { " " };
        lines.push(format!(
            "{marker} {} {:<8} {:<8} h={:<2} gain={:.2}",
            lane.id,
            lane.name,
            lane.mode,
            lane.height(),
            lane.gain
        ));
    }
    Ok(CommandOutcome::Lines(lines))
}

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandDef::new("lane_toggle", CATEGORY, "Show or hide a lane", lane_toggle)
            .long("Hidden lanes come back in their previous size mode.")
            .param(lane_param())
            .key("0-9"),
    );
    registry.register(
        CommandDef::new("lane_mode", CATEGORY, "Switch lane between compact and full", lane_mode)
            .param(lane_param())
            .key("Shift+0-9"),
    );
    registry.register(
        CommandDef::new("lane_height", CATEGORY, "Set lane height in full mode", lane_height)
            .param(lane_param())
            .param(
                CommandParam::int("height", "Height in lines")
                    .range(1.0, f64::from(MAX_FULL_HEIGHT)),
            ),
    );
    registry.register(
        CommandDef::new("lane_gain", CATEGORY, "Set lane gain", lane_gain)
            .param(lane_param())
            .param(CommandParam::float("gain", "Gain, or a multiplier like 2x").range(0.0, 100.0)),
    );
    registry.register(
        CommandDef::new("gain", CATEGORY, "Set channel gain", gain)
            .long("Targets ch0-ch3 or a lane number. A value like 1.5x multiplies the current gain.")
            .param(
                CommandParam::string("target", "Channel (ch0-ch3) or lane number")
                    .with_completions(&["ch0", "ch1", "ch2", "ch3"]),
            )
            .param(CommandParam::float("value", "Gain, or a multiplier like 2x").range(0.0, 100.0)),
    );
    registry.register(CommandDef::new("lanes", CATEGORY, "List lanes", list).aliases(&["ls"]));
}
