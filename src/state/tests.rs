use super::*;

#[test]
fn seek_and_scrub_clamp_to_timeline() {
    let mut transport = Transport::new(10.0);
    transport.seek(12.0);
    assert_eq!(transport.position, 10.0);
    transport.scrub(-20.0);
    assert_eq!(transport.position, 0.0);
    transport.scrub_pct(50.0);
    assert_eq!(transport.position, 5.0);
}

#[test]
fn update_stops_at_end() {
    let mut transport = Transport::new(1.0);
    assert!(transport.toggle_play());
    transport.update(0.4);
    assert!((transport.position - 0.4).abs() < 1e-9);
    transport.update(5.0);
    assert_eq!(transport.position, 1.0);
    assert!(!transport.playing);
}

#[test]
fn home_and_end_stop_playback() {
    let mut transport = Transport::new(10.0);
    transport.zoom(2.0);
    transport.toggle_play();
    transport.end();
    assert_eq!(transport.position, 8.0);
    assert!(!transport.playing);
    transport.home();
    assert_eq!(transport.position, 0.0);
}

#[test]
fn zoom_is_bounded() {
    let mut transport = Transport::new(4.0);
    transport.zoom(100.0);
    assert_eq!(transport.span, 4.0);
    transport.zoom(0.0);
    assert_eq!(transport.span, 0.01);
    transport.zoom(1.0);
    transport.zoom_in();
    assert!((transport.span - 0.8).abs() < 1e-9);
    transport.zoom_out();
    assert!((transport.span - 1.0).abs() < 1e-9);
}

#[test]
fn kernel_validation_orders_time_constants() {
    let mut kernel = KernelParams::default();
    assert!(kernel.validate().is_ok());
    kernel.tau_a = 0.01;
    assert!(kernel.validate().is_err());
}

#[test]
fn semitone_shift_halves_per_octave() {
    let shifted = KernelParams::shift_semitones(0.004, 12.0);
    assert!((shifted - 0.002).abs() < 1e-12);
    assert_eq!(KernelParams::shift_semitones(0.9, -24.0), MAX_TAU);
}

#[test]
fn markers_stay_sorted_with_unique_labels() {
    let mut markers = MarkerStore::default();
    markers.add("b", 2.0).expect("add b");
    markers.add("a", 1.0).expect("add a");
    markers.add("c", 3.0).expect("add c");
    assert_eq!(markers.labels(), vec!["a", "b", "c"]);
    assert!(markers.add("a", 5.0).is_err());

    assert_eq!(markers.next_after(1.0).map(|m| m.label.as_str()), Some("b"));
    assert_eq!(markers.prev_before(1.0).map(|m| m.label.as_str()), None);
    assert!(markers.remove("b"));
    assert!(!markers.remove("b"));
    assert_eq!(markers.len(), 2);
}

#[test]
fn lanes_default_layout() {
    let lanes = LaneStore::default();
    assert_eq!(lanes.iter().count(), LANE_COUNT);
    assert_eq!(lanes.visible_data_lanes().count(), 4);
    // Events hidden, logs visible.
    assert_eq!(lanes.special_lane_heights(), vec![0, SPECIAL_LANE_HEIGHT]);
}

#[test]
fn toggle_restores_saved_mode() {
    let mut lanes = LaneStore::default();
    lanes.cycle_mode(2).expect("cycle");
    assert_eq!(lanes.get(2).map(Lane::height), Some(8));
    assert_eq!(lanes.toggle_visibility(2), Ok("Lane 2 (pulse1): hidden".to_string()));
    assert_eq!(
        lanes.toggle_visibility(2),
        Ok("Lane 2 (pulse1): visible (8 lines)".to_string())
    );
    assert_eq!(lanes.current, 2);
    assert!(lanes.toggle_visibility(42).is_err());
}

#[test]
fn special_lanes_have_fixed_height() {
    let mut lanes = LaneStore::default();
    let message = lanes.cycle_mode(EVENTS_LANE).expect("cycle");
    assert!(message.contains("special lane"));
    lanes.toggle_visibility(EVENTS_LANE).expect("toggle");
    assert_eq!(
        lanes.special_lane_heights(),
        vec![SPECIAL_LANE_HEIGHT, SPECIAL_LANE_HEIGHT]
    );
}

#[test]
fn full_height_and_gain() {
    let mut lanes = LaneStore::default();
    assert!(lanes.set_full_height(1, 0).is_err());
    assert!(lanes.set_full_height(1, 31).is_err());
    lanes.set_full_height(1, 12).expect("height");
    assert_eq!(lanes.get(1).map(|l| l.full_height), Some(12));

    lanes.set_gain(3, 2.0).expect("gain");
    assert_eq!(lanes.multiply_gain(3, 1.5), Ok(3.0));
}

#[test]
fn log_lane_content_is_capped() {
    let mut lanes = LaneStore::default();
    for i in 0..150 {
        lanes.add_log(format!("line {i}"));
    }
    let logs = lanes.get(LOGS_LANE).expect("logs lane");
    assert_eq!(logs.content.len(), 100);
    assert_eq!(logs.content.front().map(String::as_str), Some("line 50"));
}

#[test]
fn display_mode_toggles() {
    assert_eq!(DisplayMode::Envelope.toggled(), DisplayMode::Points);
    assert_eq!(DisplayMode::from_name("POINTS"), Some(DisplayMode::Points));
    assert_eq!(DisplayMode::from_name("bars"), None);
}
