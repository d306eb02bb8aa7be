pub mod app;
pub mod cli;
pub mod constants;
pub mod dialogue;
pub mod extraction;
pub mod models;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod tutor;
pub mod utils;

pub use app::{load_config, Config};
pub use dialogue::{CandidateSet, PromptComposer, SlotName, SlotSet};
pub use extraction::{EntityExtractor, Intent, IntentClassifier};
pub use models::{ClientFactory, CompletionClient};
pub use session::{Assistant, Session, SharedSession, TurnOutcome};
pub use tui::run_ui;
pub use utils::FoodScoutError;
