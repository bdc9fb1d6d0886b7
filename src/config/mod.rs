//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{
    DEFAULT_CLI_OUTPUT_MAX_HEIGHT, DEFAULT_COMPLETION_MAX_ITEMS, DEFAULT_COMPLETION_PREVIEW_HEIGHT,
    DEFAULT_DURATION_SECONDS, DEFAULT_HEADER_HEIGHT, DEFAULT_MIN_DATA_VIEWPORT,
};

/// CLI options for the tau terminal workstation.
#[derive(Debug, Parser, Clone)]
#[command(name = "tau", about = "tau terminal audio workstation", author, version)]
pub struct AppConfig {
    /// Alias file (TOML). Defaults to <config dir>/tau/aliases.toml
    #[arg(long = "aliases-path", env = "TAU_ALIASES", value_name = "PATH")]
    pub aliases_path: Option<PathBuf>,

    /// Length of the loaded timeline in seconds
    #[arg(long, default_value_t = DEFAULT_DURATION_SECONDS, value_name = "SECONDS")]
    pub duration: f64,

    /// Audio file named in analysis requests
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// Precomputed analysis table (whitespace-separated columns) loaded on `reprocess`
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Header rows at the top of the screen
    #[arg(long = "header-height", default_value_t = DEFAULT_HEADER_HEIGHT)]
    pub header_height: u16,

    /// Maximum rows for CLI output when no completion popup is shown
    #[arg(long = "cli-output-max-height", default_value_t = DEFAULT_CLI_OUTPUT_MAX_HEIGHT)]
    pub cli_output_max_height: u16,

    /// Rows always reserved for data lanes
    #[arg(long = "min-data-viewport", default_value_t = DEFAULT_MIN_DATA_VIEWPORT)]
    pub min_data_viewport: u16,

    /// Maximum completion items shown in the popup
    #[arg(long = "completion-max-items", default_value_t = DEFAULT_COMPLETION_MAX_ITEMS)]
    pub completion_max_items: u16,

    /// Rows for the completion help preview
    #[arg(
        long = "completion-preview-height",
        default_value_t = DEFAULT_COMPLETION_PREVIEW_HEIGHT
    )]
    pub completion_preview_height: u16,

    /// Print the command registry grouped by category and exit
    #[arg(long = "list-commands", default_value_t = false)]
    pub list_commands: bool,

    /// Print the command registry as JSON and exit
    #[arg(long = "dump-commands", default_value_t = false)]
    pub dump_commands: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "TAU_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "TAU_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging command lines typed by the user (debug log only)
    #[arg(long = "log-content", env = "TAU_LOG_CONTENT", default_value_t = false)]
    pub log_content: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,
}

impl AppConfig {
    pub fn logging_enabled(&self) -> bool {
        (self.logs || self.log_timings) && !self.no_logs
    }
}
