// Gateway module for runtime - follows the Train Station Pattern
// All external access must go through this gateway

mod non_interactive;
mod orchestrator;
mod plain;

pub use non_interactive::{ExecutionMetadata, NonInteractiveResult, NonInteractiveRunner};
pub use orchestrator::{build_assistant, resolve_config, Orchestrator};
pub use plain::run_plain;
