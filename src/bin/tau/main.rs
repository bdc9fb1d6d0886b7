use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use tau::{
    command::{CommandCategory, CommandRegistry},
    config::AppConfig,
    init_logging, init_tracing, log_debug, log_file_path, ui, App,
};

#[cfg(not(test))]
fn main() -> Result<()> {
    run_with_args(env::args_os())
}

#[cfg_attr(test, allow(dead_code))]
fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut config = AppConfig::parse_from(args);

    if config.list_commands {
        print!("{}", render_command_list(&CommandRegistry::with_builtins()));
        return Ok(());
    }
    if config.dump_commands {
        let json = serde_json::to_string_pretty(&CommandRegistry::with_builtins().metadata())
            .context("failed to encode command metadata")?;
        println!("{json}");
        return Ok(());
    }

    config.validate()?;
    init_logging(&config);
    init_tracing(&config);
    log_debug("=== tau started ===");
    log_debug(&format!("log file: {:?}", log_file_path()));

    let mut app = App::new(&config);
    let result = ui::run_app(&mut app);

    log_debug("=== tau exiting ===");
    if let Err(ref e) = result {
        log_debug(&format!("exit with error: {e:#}"));
    }
    result
}

fn render_command_list(registry: &CommandRegistry) -> String {
    let mut output = String::new();
    for category in CommandCategory::ALL {
        let commands = registry.list_by_category(category);
        if commands.is_empty() {
            continue;
        }
        output.push_str(&format!("{category}:\n"));
        for def in commands.into_iter().filter(|def| !def.hidden) {
            output.push_str(&format!("  {}\n", def.summary_line()));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_list_groups_by_category() {
        let listing = render_command_list(&CommandRegistry::with_builtins());
        let transport = listing.find("transport:").expect("transport header");
        let system = listing.find("system:").expect("system header");
        assert!(transport < system);
        assert!(listing.contains("  seek <time>"));
    }

    #[test]
    fn dump_and_list_exit_before_terminal_setup() {
        assert!(run_with_args(["tau", "--list-commands"]).is_ok());
        assert!(run_with_args(["tau", "--dump-commands"]).is_ok());
    }

    #[test]
    fn invalid_config_is_rejected_before_terminal_setup() {
        let err = run_with_args(["tau", "--header-height", "9"]).unwrap_err();
        assert!(err.to_string().contains("--header-height"));
    }
}
