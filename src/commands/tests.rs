use crate::command::{parse, CommandCategory, CommandError, CommandOutcome, CommandRegistry};
use crate::state::{AppState, DisplayMode, LaneMode};

fn run(registry: &CommandRegistry, state: &mut AppState, line: &str) -> Result<CommandOutcome, CommandError> {
    let parsed = parse(line).expect("non-empty line");
    registry.dispatch(state, &parsed.verb, &parsed.args)
}

#[test]
fn every_category_has_commands() {
    let registry = CommandRegistry::with_builtins();
    for category in CommandCategory::ALL {
        assert!(registry.category_count(category) > 0, "{category} is empty");
    }
}

#[test]
fn transport_commands_move_the_playhead() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();

    run(&registry, &mut state, "seek 1500ms").expect("seek");
    assert!((state.transport.position - 1.5).abs() < 1e-9);
    run(&registry, &mut state, "scrub -0.5").expect("scrub");
    assert!((state.transport.position - 1.0).abs() < 1e-9);
    run(&registry, &mut state, "scrub_pct 10").expect("scrub_pct");
    assert!((state.transport.position - 7.0).abs() < 1e-9);
    run(&registry, &mut state, "rw").expect("builtin alias");
    assert_eq!(state.transport.position, 0.0);

    run(&registry, &mut state, "pause").expect("toggle");
    assert!(state.transport.playing);
    run(&registry, &mut state, "stop").expect("stop");
    assert!(!state.transport.playing);

    assert!(matches!(
        run(&registry, &mut state, "scrub_pct 150"),
        Err(CommandError::InvalidValue { .. })
    ));
}

#[test]
fn zoom_commands_change_span() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();
    run(&registry, &mut state, "zoom 4").expect("zoom");
    assert_eq!(state.transport.span, 4.0);
    run(&registry, &mut state, "zi").expect("zoom in");
    assert!((state.transport.span - 3.2).abs() < 1e-9);
}

#[test]
fn kernel_updates_keep_params_valid() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();

    run(&registry, &mut state, "tau_a 2ms").expect("tau_a");
    assert!((state.kernel.tau_a - 0.002).abs() < 1e-12);

    // Attack above release is rejected and leaves the kernel untouched.
    let err = run(&registry, &mut state, "tau_a 0.01").unwrap_err();
    assert!(matches!(err, CommandError::Handler(_)));
    assert!((state.kernel.tau_a - 0.002).abs() < 1e-12);

    run(&registry, &mut state, "threshold 4.5").expect("thr alias");
    assert_eq!(state.kernel.threshold, 4.5);

    run(&registry, &mut state, "tau_r_semitone 12").expect("semitone");
    assert!((state.kernel.tau_r - 0.0025).abs() < 1e-12);

    assert_eq!(
        run(&registry, &mut state, "reprocess").expect("reprocess"),
        CommandOutcome::Analyze
    );
}

#[test]
fn gain_accepts_channels_and_multipliers() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();

    run(&registry, &mut state, "gain ch1 2").expect("gain");
    assert_eq!(state.lanes.get(2).map(|l| l.gain), Some(2.0));
    run(&registry, &mut state, "gain ch1 1.5x").expect("multiply");
    assert_eq!(state.lanes.get(2).map(|l| l.gain), Some(3.0));
    run(&registry, &mut state, "gain 5 0.5").expect("lane target");
    assert_eq!(state.lanes.get(5).map(|l| l.gain), Some(0.5));

    let err = run(&registry, &mut state, "gain ch5 1").unwrap_err();
    assert!(err.to_string().contains("unknown gain target: ch5"));
}

#[test]
fn lane_commands_report_status() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();

    let outcome = run(&registry, &mut state, "lane_toggle 1").expect("toggle");
    assert_eq!(outcome, CommandOutcome::message("Lane 1 (audio): hidden"));
    run(&registry, &mut state, "lane_mode 3").expect("mode");
    assert_eq!(state.lanes.get(3).map(|l| l.mode), Some(LaneMode::Full));
    run(&registry, &mut state, "lane_height 3 12").expect("height");
    assert_eq!(state.lanes.get(3).map(|l| l.height()), Some(12));
    assert!(run(&registry, &mut state, "lane_height 3 40").is_err());
    assert!(run(&registry, &mut state, "lane_toggle 12").is_err());
}

#[test]
fn markers_round_trip_through_commands() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();

    run(&registry, &mut state, "seek 2").expect("seek");
    run(&registry, &mut state, "mark intro").expect("mark at position");
    run(&registry, &mut state, "mark outro 9").expect("mark at time");
    assert!(run(&registry, &mut state, "mark intro 3").is_err());

    run(&registry, &mut state, "nm").expect("next");
    assert_eq!(state.transport.position, 9.0);
    run(&registry, &mut state, "prev_marker").expect("prev");
    assert_eq!(state.transport.position, 2.0);
    run(&registry, &mut state, "goto outro").expect("goto");
    assert_eq!(state.transport.position, 9.0);

    run(&registry, &mut state, "dm intro").expect("delete");
    assert!(run(&registry, &mut state, "goto intro").is_err());
    assert_eq!(state.markers.labels(), vec!["outro"]);
}

#[test]
fn view_commands_switch_mode_and_layout() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();

    run(&registry, &mut state, "toggle_mode").expect("toggle");
    assert_eq!(state.display, DisplayMode::Points);
    run(&registry, &mut state, "display_mode envelope").expect("set");
    assert_eq!(state.display, DisplayMode::Envelope);
    assert!(run(&registry, &mut state, "display_mode bars").is_err());

    run(&registry, &mut state, "layout_set header_height 3").expect("layout_set");
    assert_eq!(state.layout.header_height, 3);
    assert!(run(&registry, &mut state, "layout_set nope 3").is_err());
}

#[test]
fn system_commands_map_to_outcomes() {
    let registry = CommandRegistry::with_builtins();
    let mut state = AppState::default();
    assert_eq!(run(&registry, &mut state, "exit").expect("quit"), CommandOutcome::Quit);
    assert_eq!(run(&registry, &mut state, "clear").expect("clear"), CommandOutcome::ClearOutput);
}
