use super::AppConfig;
use crate::layout::LayoutConfig;
use clap::Parser;
use std::io::Write;

#[test]
fn defaults_validate() {
    let mut cfg = AppConfig::parse_from(["tau"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.duration, 60.0);
    assert_eq!(cfg.layout_config(), LayoutConfig::default());
    assert!(!cfg.logging_enabled());
}

#[test]
fn rejects_non_positive_duration() {
    let mut cfg = AppConfig::parse_from(["tau", "--duration", "0"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["tau", "--duration=-3"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["tau", "--duration", "100000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_header_height_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["tau", "--header-height", "0"]);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("--header-height must be between 1 and 4"));

    let mut cfg = AppConfig::parse_from(["tau", "--header-height", "5"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_layout_overrides_out_of_bounds() {
    for args in [
        ["tau", "--cli-output-max-height", "0"],
        ["tau", "--cli-output-max-height", "51"],
        ["tau", "--min-data-viewport", "0"],
        ["tau", "--completion-max-items", "21"],
        ["tau", "--completion-preview-height", "11"],
    ] {
        let mut cfg = AppConfig::parse_from(args);
        assert!(cfg.validate().is_err(), "{args:?} should be rejected");
    }
}

#[test]
fn accepts_layout_override_bounds() {
    let mut cfg = AppConfig::parse_from([
        "tau",
        "--header-height",
        "4",
        "--cli-output-max-height",
        "50",
        "--min-data-viewport",
        "1",
        "--completion-max-items",
        "20",
        "--completion-preview-height",
        "0",
    ]);
    assert!(cfg.validate().is_ok());

    let layout = cfg.layout_config();
    assert_eq!(layout.header_height, 4);
    assert_eq!(layout.cli_output_max_height, 50);
    assert_eq!(layout.min_data_viewport, 1);
    assert_eq!(layout.completion_max_items, 20);
    assert_eq!(layout.completion_preview_height, 0);
    assert_eq!(layout.cli_prompt_offset, LayoutConfig::default().cli_prompt_offset);
}

#[test]
fn large_data_viewport_raises_minimum_terminal_height() {
    let cfg = AppConfig::parse_from(["tau", "--header-height", "4", "--min-data-viewport", "40"]);
    let layout = cfg.layout_config();
    assert_eq!(layout.min_terminal_height, 4 + 1 + 1 + 40);
    assert!(layout.with_override("completion_max_items", 5).is_ok());
}

#[test]
fn rejects_missing_input_files() {
    let mut cfg = AppConfig::parse_from(["tau", "--data", "/nonexistent/tau/table.tsv"]);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("--data file not found"));

    let mut cfg = AppConfig::parse_from(["tau", "--audio", "/nonexistent/tau/in.wav"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_existing_data_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "0 1 2 0").expect("write");
    let path = file.path().to_string_lossy().to_string();
    let mut cfg = AppConfig::parse_from(["tau", "--data", path.as_str()]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_alias_path_that_is_a_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().to_string_lossy().to_string();
    let mut cfg = AppConfig::parse_from(["tau", "--aliases-path", path.as_str()]);
    assert!(cfg.validate().is_err());
}

#[test]
fn explicit_alias_path_wins() {
    let cfg = AppConfig::parse_from(["tau", "--aliases-path", "/tmp/tau-aliases.toml"]);
    assert_eq!(
        cfg.resolved_aliases_path().as_deref(),
        Some(std::path::Path::new("/tmp/tau-aliases.toml"))
    );
}

#[test]
fn no_logs_overrides_logs() {
    let cfg = AppConfig::parse_from(["tau", "--logs", "--no-logs"]);
    assert!(!cfg.logging_enabled());
    let cfg = AppConfig::parse_from(["tau", "--log-timings"]);
    assert!(cfg.logging_enabled());
}
