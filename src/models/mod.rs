// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod factory;
mod openai;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use factory::ClientFactory;
pub use openai::OpenAiClient;
pub use traits::CompletionClient;
#[cfg(test)]
pub use traits::MockCompletionClient;
pub use types::{
    build_messages, ChatMessage, CompletionResponse, MessageRole, SamplingParams, TokenUsage,
};
