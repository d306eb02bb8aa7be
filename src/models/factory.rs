use anyhow::{Context, Result};
use std::sync::Arc;

use super::openai::OpenAiClient;
use super::traits::CompletionClient;
use crate::app::{Config, Credentials};

/// Factory for completion clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create the completion client described by `config`
    pub fn create(config: &Config, credentials: &Credentials) -> Result<Arc<dyn CompletionClient>> {
        let client = OpenAiClient::new(&config.completion, credentials)
            .context("Failed to create completion client")?;
        Ok(Arc::new(client))
    }

    /// List model ids offered by the configured endpoint
    pub async fn list_available(config: &Config, credentials: &Credentials) -> Result<Vec<String>> {
        let client = OpenAiClient::new(&config.completion, credentials)?;
        client
            .list_models()
            .await
            .with_context(|| format!("Failed to list models from {}", config.completion.base_url))
    }

    /// Validate that the configured endpoint is reachable
    pub async fn validate(config: &Config, credentials: &Credentials) -> Result<bool> {
        let client = Self::create(config, credentials)?;
        Ok(client.validate_connection().await?)
    }
}
