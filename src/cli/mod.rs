// Gateway module for cli - follows the Train Station Pattern
// All external access must go through this gateway

mod args;
mod commands;

pub use args::{Cli, Commands, OutputFormat};
pub use commands::{handle_command, list_models, show_version};
