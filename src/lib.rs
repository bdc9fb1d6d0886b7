pub mod alias;
pub mod app;
pub mod cli;
pub mod command;
pub mod commands;
pub mod completion;
pub mod config;
pub mod layout;
mod lock;
pub mod state;
mod telemetry;
pub mod terminal_restore;
pub mod ui;
pub mod utf8_safe;
pub mod worker;

pub use app::logging::{init_logging, log_debug, log_debug_content, log_file_path, log_panic};
pub use app::App;
pub(crate) use lock::lock_or_recover;
pub use telemetry::init_tracing;
