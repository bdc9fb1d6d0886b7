use super::*;
use crate::state::AppState;

fn ok_handler(_state: &mut AppState, args: &[Value]) -> Result<CommandOutcome, String> {
    let rendered: Vec<String> = args.iter().map(Value::as_text).collect();
    Ok(CommandOutcome::message(rendered.join(" ")))
}

fn other_handler(_state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    Ok(CommandOutcome::message("second"))
}

fn failing_handler(_state: &mut AppState, _args: &[Value]) -> Result<CommandOutcome, String> {
    Err("lane 12 out of range".to_string())
}

fn seek_def() -> CommandDef {
    CommandDef::new("seek", CommandCategory::Transport, "Seek to time", ok_handler)
        .param(CommandParam::float("time", "Target time in seconds").at_least(0.0))
        .aliases(&["goto_time"])
        .key("g")
}

fn marker_completer(_state: &AppState, _index: usize, partial: &str) -> Vec<String> {
    ["intro", "outro"]
        .iter()
        .filter(|label| label.starts_with(partial))
        .map(|label| label.to_string())
        .collect()
}

#[test]
fn last_registration_wins() {
    let mut registry = CommandRegistry::new();
    registry.register(seek_def());
    registry.register(CommandDef::new(
        "seek",
        CommandCategory::Transport,
        "replacement",
        other_handler,
    ));

    let def = registry.get("seek").expect("seek registered");
    assert_eq!(def.short, "replacement");
    assert_eq!(registry.len(), 1);
    // Aliases and key bindings of the overwritten definition are dropped.
    assert!(registry.lookup("goto_time").is_none());
    assert!(registry.get_by_key("g").is_none());
}

#[test]
fn get_is_exact_and_lookup_resolves_builtin_aliases() {
    let mut registry = CommandRegistry::new();
    registry.register(seek_def());
    assert!(registry.get("goto_time").is_none());
    assert!(registry.get("SEEK").is_none());
    assert_eq!(registry.resolve_name("goto_time"), Some("seek"));
    assert_eq!(registry.lookup("goto_time").map(|d| d.name.as_str()), Some("seek"));
    assert_eq!(registry.get_by_key("g").map(|d| d.name.as_str()), Some("seek"));
}

#[test]
fn list_names_filters_case_insensitively_and_sorts() {
    let mut registry = CommandRegistry::new();
    for name in ["stop", "seek", "scrub", "play"] {
        registry.register(CommandDef::new(name, CommandCategory::Transport, "", ok_handler));
    }
    registry.register(
        CommandDef::new("secret", CommandCategory::System, "", ok_handler).hidden(),
    );

    assert_eq!(registry.list_names("S"), vec!["scrub", "seek", "stop"]);
    assert_eq!(registry.list_names(""), vec!["play", "scrub", "seek", "stop"]);
    assert!(registry.list_names("x").is_empty());
    for name in registry.list_names("s") {
        assert!(name.to_lowercase().starts_with('s'));
    }
}

#[test]
fn dispatch_reports_unknown_command() {
    let registry = CommandRegistry::new();
    let mut state = AppState::default();
    let err = registry.dispatch(&mut state, "warp", &[]).unwrap_err();
    assert_eq!(err, CommandError::UnknownCommand("warp".to_string()));
    assert!(err.to_string().starts_with("no such command: warp"));
}

#[test]
fn dispatch_reports_missing_argument_with_usage() {
    let mut registry = CommandRegistry::new();
    registry.register(seek_def());
    let mut state = AppState::default();
    let err = registry.dispatch(&mut state, "seek", &[]).unwrap_err();
    assert_eq!(err.to_string(), "missing argument <time> (usage: seek <time>)");
}

#[test]
fn dispatch_rejects_out_of_bounds_values() {
    let mut registry = CommandRegistry::new();
    registry.register(seek_def());
    let mut state = AppState::default();
    let err = registry
        .dispatch(&mut state, "seek", &[Argument::Number(-1.0)])
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid value for time: must be >= 0");

    let err = registry
        .dispatch(&mut state, "seek", &[Argument::Text("soon".into())])
        .unwrap_err();
    assert!(matches!(err, CommandError::InvalidValue { ref name, .. } if name == "time"));
}

#[test]
fn dispatch_fills_defaults_and_ignores_extra_args() {
    let mut registry = CommandRegistry::new();
    registry.register(
        CommandDef::new("mark", CommandCategory::Markers, "Add marker", ok_handler)
            .param(CommandParam::string("label", "Marker label"))
            .param(CommandParam::float("time", "Marker time").optional(Value::Float(2.5))),
    );
    let mut state = AppState::default();

    let outcome = registry
        .dispatch(&mut state, "mark", &[Argument::Text("intro".into())])
        .expect("dispatch");
    assert_eq!(outcome, CommandOutcome::message("intro 2.5"));

    let outcome = registry
        .dispatch(
            &mut state,
            "mark",
            &[
                Argument::Text("intro".into()),
                Argument::Number(1.0),
                Argument::Text("extra".into()),
            ],
        )
        .expect("dispatch");
    assert_eq!(outcome, CommandOutcome::message("intro 1"));
}

#[test]
fn handler_failures_surface_as_messages() {
    let mut registry = CommandRegistry::new();
    registry.register(CommandDef::new("boom", CommandCategory::Lanes, "", failing_handler));
    let mut state = AppState::default();
    let err = registry.dispatch(&mut state, "boom", &[]).unwrap_err();
    assert_eq!(err, CommandError::Handler("lane 12 out of range".to_string()));
    assert_eq!(err.to_string(), "lane 12 out of range");
}

#[test]
fn coercion_covers_each_param_type() {
    let int = CommandParam::int("lane", "Lane").range(0.0, 9.0);
    assert_eq!(int.coerce(&Argument::Number(3.0)), Ok(Value::Int(3)));
    assert!(int.coerce(&Argument::Number(3.5)).is_err());
    assert!(int.coerce(&Argument::Number(12.0)).is_err());

    let flag = CommandParam::boolean("enabled", "Flag");
    assert_eq!(flag.coerce(&Argument::Text("On".into())), Ok(Value::Bool(true)));
    assert_eq!(flag.coerce(&Argument::Number(0.0)), Ok(Value::Bool(false)));
    assert!(flag.coerce(&Argument::Text("maybe".into())).is_err());

    let mode = CommandParam::choice("mode", "Display mode", &["envelope", "points"]);
    assert_eq!(
        mode.coerce(&Argument::Text("POINTS".into())),
        Ok(Value::Text("points".into()))
    );
    assert_eq!(
        mode.coerce(&Argument::Text("bars".into())),
        Err("must be one of: envelope, points".to_string())
    );

    let gain = CommandParam::float("gain", "Gain").range(0.0, 10.0);
    assert_eq!(gain.coerce(&Argument::Multiplier(1.5)), Ok(Value::Multiplier(1.5)));
    assert!(gain.coerce(&Argument::Channel(1)).is_err());

    let target = CommandParam::string("target", "Target");
    assert_eq!(target.coerce(&Argument::Channel(2)), Ok(Value::Channel(2)));
    assert_eq!(target.coerce(&Argument::Number(4.0)), Ok(Value::Text("4".into())));
}

#[test]
fn completions_prefer_provider_then_static_list() {
    let state = AppState::default();
    let with_static = CommandDef::new("display_mode", CommandCategory::View, "", ok_handler)
        .param(CommandParam::choice("mode", "Mode", &["envelope", "points"]));
    assert_eq!(with_static.get_completions(&state, 0, "P"), vec!["points"]);
    assert!(with_static.get_completions(&state, 1, "").is_empty());

    let with_provider = CommandDef::new("goto", CommandCategory::Markers, "", ok_handler)
        .param(CommandParam::string("label", "Label").with_completions(&["ignored"]))
        .completer(marker_completer);
    assert_eq!(with_provider.get_completions(&state, 0, "in"), vec!["intro"]);
    assert!(with_provider.get_completions(&state, 3, "").is_empty());

    let mut registry = CommandRegistry::new();
    registry.register(with_provider);
    assert_eq!(registry.get_completions("goto", &state, 0, "o"), vec!["outro"]);
    assert!(registry.get_completions("nope", &state, 0, "").is_empty());
}

#[test]
fn usage_and_help_lines_describe_params() {
    let def = CommandDef::new("mark", CommandCategory::Markers, "Add marker", ok_handler)
        .long("Places a named marker.")
        .param(CommandParam::string("label", "Marker label"))
        .param(
            CommandParam::float("time", "Marker time")
                .range(0.0, 60.0)
                .optional(Value::Float(0.0)),
        )
        .aliases(&["m"])
        .key("m");

    assert_eq!(def.usage(), "mark <label> [time]");
    assert_eq!(def.params[1].spec(), "time <float> [0..60] =0");

    let help = def.help_lines();
    assert_eq!(help[0], "Command: mark");
    assert_eq!(help[1], "Aliases: m");
    assert_eq!(help[2], "Usage: mark <label> [time]");
    assert!(help.contains(&"Parameters:".to_string()));
    assert!(help.contains(&"Keyboard: m".to_string()));
    assert_eq!(help.last().map(String::as_str), Some("Category: markers (color 4)"));
}

#[test]
fn enum_spec_lists_choices() {
    let param = CommandParam::choice("mode", "Mode", &["envelope", "points"]);
    assert_eq!(param.spec(), "mode (envelope | points)");
}

#[test]
fn categories_resolve_by_name() {
    assert_eq!(CommandCategory::from_name("Lanes"), Some(CommandCategory::Lanes));
    assert_eq!(CommandCategory::from_name("nope"), None);
    let colors: Vec<u8> = CommandCategory::ALL.iter().map(|c| c.color()).collect();
    assert_eq!(colors, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn builtin_commands_keep_required_params_first() {
    let registry = CommandRegistry::with_builtins();
    assert!(!registry.is_empty());
    for def in registry.list_all() {
        assert!(def.params_well_ordered(), "{} has a required param after an optional one", def.name);
    }
}

#[test]
fn metadata_lists_visible_commands_as_json() {
    let registry = CommandRegistry::with_builtins();
    let json = registry.metadata();
    let commands = json.as_array().expect("array");
    assert_eq!(commands.len(), registry.list_names("").len());

    let seek = commands
        .iter()
        .find(|cmd| cmd["name"] == "seek")
        .expect("seek listed");
    assert_eq!(seek["category"], "transport");
    assert_eq!(seek["usage"], "seek <time>");
    assert_eq!(seek["params"][0]["kind"], "float");
    assert_eq!(seek["params"][0]["min"], 0.0);
}
