use async_trait::async_trait;

use super::types::{ChatMessage, CompletionResponse, SamplingParams};
use crate::utils::FoodScoutError;

/// Core trait for chat-completion backends
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the message sequence and return the assistant's reply
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<CompletionResponse, FoodScoutError>;

    /// Get the name of the model
    fn name(&self) -> String;

    /// Validate that the service is reachable with the configured key
    async fn validate_connection(&self) -> Result<bool, FoodScoutError> {
        Ok(true)
    }
}
