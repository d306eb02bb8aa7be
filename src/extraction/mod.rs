// Gateway module for entity extraction - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod extractor;
mod intent;
mod tagger;

// Public re-exports - the ONLY way to access extraction functionality
pub use extractor::EntityExtractor;
pub use intent::{Intent, IntentClassifier};
pub use tagger::{EntityLabel, EntityTagger, GazetteerTagger, TaggedSpan};
