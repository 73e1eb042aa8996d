//! Command-line interface for the shoprag binary.

mod commands;
mod scenario;
mod serve;

pub use commands::{Cli, Commands, ScenarioCommand, resolve_config_path};
pub use scenario::{handle_run_command, handle_validate_command};
pub use serve::handle_serve_command;
