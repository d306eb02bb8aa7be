// Gateway module for dialogue state - follows the Train Station Pattern
// All external access must go through this gateway

mod prompt;
mod slots;

pub use prompt::PromptComposer;
pub use slots::{CandidateSet, SlotName, SlotSet};
