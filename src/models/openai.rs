use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::traits::CompletionClient;
use super::types::{ChatMessage, CompletionResponse, SamplingParams, TokenUsage};
use crate::app::{CompletionConfig, Credentials};
use crate::utils::FoodScoutError;

const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Client for an OpenAI-compatible chat-completion endpoint
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model_name: String,
    api_key: String,
    organization: Option<String>,
}

impl OpenAiClient {
    /// Create a new client from validated configuration
    pub fn new(config: &CompletionConfig, credentials: &Credentials) -> Result<Self, FoodScoutError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FoodScoutError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model.clone(),
            api_key: credentials.api_key.clone(),
            organization: credentials.organization.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(&self.api_key);
        match &self.organization {
            Some(org) => request.header("OpenAI-Organization", org),
            None => request,
        }
    }

    /// OpenAI request body
    fn request_body(&self, messages: &[ChatMessage], params: &SamplingParams) -> Value {
        json!({
            "model": self.model_name,
            "messages": messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        })
    }

    /// Model ids offered by the endpoint
    pub async fn list_models(&self) -> Result<Vec<String>, FoodScoutError> {
        let response = self
            .authorize(self.client.get(self.endpoint("models")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FoodScoutError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let models: ModelsResponse = response.json().await?;
        let mut ids: Vec<String> = models.data.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<CompletionResponse, FoodScoutError> {
        let url = self.endpoint("chat/completions");
        debug!("Sending {} messages to {}", messages.len(), url);

        let response = self
            .authorize(self.client.post(&url))
            .json(&self.request_body(messages, params))
            .send()
            .await
            .map_err(|e| FoodScoutError::Network(format!("Failed to reach {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FoodScoutError::Api {
                status: status.as_u16(),
                body: api_error_message(&body),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| FoodScoutError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                FoodScoutError::MalformedResponse("response contained no message content".to_string())
            })?;

        Ok(CompletionResponse {
            content: content.trim().to_string(),
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model_name: completion.model.unwrap_or_else(|| self.model_name.clone()),
        })
    }

    fn name(&self) -> String {
        self.model_name.clone()
    }

    async fn validate_connection(&self) -> Result<bool, FoodScoutError> {
        let request = self
            .authorize(self.client.get(self.endpoint("models")))
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS));

        match request.send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

/// Pull `error.message` out of an OpenAI error body, else the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.to_string())
}

// Response structures (OpenAI format)

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
