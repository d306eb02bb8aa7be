// Gateway module for session - follows the Train Station Pattern
// All external access must go through this gateway

mod assistant;
mod state;
mod transcript;

pub use assistant::{Assistant, TurnOutcome};
pub use state::{Session, SharedSession, TurnPhase};
pub use transcript::{Transcript, Turn};
