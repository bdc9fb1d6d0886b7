use super::{integer, number};
use crate::command::{
    CommandCategory, CommandDef, CommandOutcome, CommandParam, CommandRegistry, Value,
};
use crate::state::{AppState, KernelParams, MAX_TAU, MIN_TAU};

const CATEGORY: CommandCategory = CommandCategory::Params;

/// Apply `change` to a copy of the kernel and keep it only if it still validates.
fn update_kernel(
    state: &mut AppState,
    change: impl FnOnce(&mut KernelParams),
    label: &str,
) -> Result<CommandOutcome, String> {
    let mut next = state.kernel;
    change(&mut next);
    next.validate()?;
    state.kernel = next;
    Ok(CommandOutcome::Message(format!("{label} \u{2192} {}", state.kernel)))
}

fn tau_a(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let value = number(args, 0)?;
    update_kernel(state, |k| k.tau_a = value, "tau_a")
}

fn tau_r(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let value = number(args, 0)?;
    update_kernel(state, |k| k.tau_r = value, "tau_r")
}

fn threshold(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let value = number(args, 0)?;
    update_kernel(state, |k| k.threshold = value, "thr")
}

fn refractory(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let value = number(args, 0)?;
    update_kernel(state, |k| k.refractory = value, "ref")
}

fn tau_a_semitone(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let steps = integer(args, 0)? as f64;
    update_kernel(
        state,
        |k| k.tau_a = KernelParams::shift_semitones(k.tau_a, steps),
        "tau_a",
    )
}

fn tau_r_semitone(state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let steps = integer(args, 0)? as f64;
    update_kernel(
        state,
        |k| k.tau_r = KernelParams::shift_semitones(k.tau_r, steps),
        "tau_r",
    )
}

fn show(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    let kernel = state.kernel;
    Ok(CommandOutcome::Lines(vec![
        "Kernel parameters:".to_string(),
        format!("  tau_a      {:.6}s", kernel.tau_a),
        format!("  tau_r      {:.6}s", kernel.tau_r),
        format!("  threshold  {:.2}", kernel.threshold),
        format!("  refractory {:.4}s", kernel.refractory),
        format!("  fs         {}", kernel.sample_rate),
    ]))
}

fn reprocess(state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    state.kernel.validate()?;
    Ok(CommandOutcome::Analyze)
}

fn tau_param() -> CommandParam {
    CommandParam::float("tau", "Time constant in seconds").range(MIN_TAU, MAX_TAU)
}

fn semitone_param() -> CommandParam {
    CommandParam::int("semitones", "Number of semitones (can be negative)").range(-24.0, 24.0)
}

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandDef::new("tau_a", CATEGORY, "Set attack time constant", tau_a)
            .long("Must stay below tau_r.")
            .param(tau_param()),
    );
    registry.register(
        CommandDef::new("tau_r", CATEGORY, "Set release time constant", tau_r)
            .param(tau_param()),
    );
    registry.register(
        CommandDef::new("thr", CATEGORY, "Set detection threshold (sigma)", threshold)
            .aliases(&["threshold"])
            .param(CommandParam::float("threshold", "Threshold in sigma").range(0.5, 20.0))
            .key("c/C"),
    );
    registry.register(
        CommandDef::new("ref", CATEGORY, "Set refractory period", refractory)
            .aliases(&["refractory"])
            .param(
                CommandParam::float("ref", "Refractory period in seconds").range(0.001, 1.0),
            )
            .key("v/V"),
    );
    registry.register(
        CommandDef::new("tau_a_semitone", CATEGORY, "Adjust tau_a by semitones", tau_a_semitone)
            .long("\u{b1}1 semitone = 2^(\u{b1}1/12) ratio.")
            .param(semitone_param())
            .key("z/Z"),
    );
    registry.register(
        CommandDef::new("tau_r_semitone", CATEGORY, "Adjust tau_r by semitones", tau_r_semitone)
            .long("\u{b1}1 semitone = 2^(\u{b1}1/12) ratio.")
            .param(semitone_param())
            .key("x/X"),
    );
    registry.register(CommandDef::new("params", CATEGORY, "Show kernel parameters", show));
    registry.register(
        CommandDef::new("reprocess", CATEGORY, "Re-run analysis with current kernel", reprocess)
            .long("Runs in the background; the UI stays responsive.")
            .key("K"),
    );
}
