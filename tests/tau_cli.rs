use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn tau_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_tau").expect("tau test binary not built")
}

#[test]
fn tau_help_mentions_name() {
    let output = Command::new(tau_bin())
        .arg("--help")
        .output()
        .expect("run tau --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("tau"));
    assert!(combined.contains("--list-commands"));
}

#[test]
fn tau_list_commands_groups_by_category() {
    let output = Command::new(tau_bin())
        .arg("--list-commands")
        .output()
        .expect("run tau --list-commands");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for category in ["transport:", "params:", "lanes:", "markers:", "view:", "system:"] {
        assert!(stdout.contains(category), "missing {category}");
    }
    assert!(stdout.contains("toggle_play"));
}

#[test]
fn tau_dump_commands_is_json() {
    let output = Command::new(tau_bin())
        .arg("--dump-commands")
        .output()
        .expect("run tau --dump-commands");
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("dump-commands emits JSON");
    let commands = json.as_array().expect("array of commands");
    assert!(commands.iter().any(|cmd| cmd["name"] == "quit"));
    assert!(commands.iter().all(|cmd| cmd["category"].is_string()));
}

#[test]
fn tau_rejects_invalid_layout_override() {
    let output = Command::new(tau_bin())
        .args(["--min-data-viewport", "0"])
        .output()
        .expect("run tau with bad flag");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--min-data-viewport"));
}
