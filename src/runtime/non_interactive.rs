use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    cli::OutputFormat,
    dialogue::SlotName,
    session::{Assistant, Session},
};

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was executed
    pub prompt: String,
    /// The assistant's reply (an apology when the completion failed)
    pub response: String,
    /// Detected intent of the prompt
    pub intent: String,
    /// Slot state after the turn, every slot present
    pub slots: Value,
    /// Slots still empty after the turn
    pub missing: Vec<String>,
    /// Any errors that occurred
    pub errors: Vec<String>,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Model used
    pub model: String,
    /// Total tokens used
    pub tokens_used: Option<usize>,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Non-interactive runner for a single-turn session
pub struct NonInteractiveRunner {
    assistant: Assistant,
}

impl NonInteractiveRunner {
    pub fn new(assistant: Assistant) -> Self {
        Self { assistant }
    }

    /// Run `prompt` as the first turn of a fresh session
    pub async fn execute(&self, prompt: String) -> NonInteractiveResult {
        let mut session = Session::new();
        let outcome = self.assistant.process_turn(&mut session, &prompt).await;

        NonInteractiveResult {
            response: outcome.reply,
            intent: outcome.intent.to_string(),
            slots: self.assistant.composer().collected_info(session.slots()),
            missing: session
                .slots()
                .missing()
                .into_iter()
                .map(|slot| slot.as_str().to_string())
                .collect(),
            errors: outcome.error.into_iter().collect(),
            metadata: ExecutionMetadata {
                model: self.assistant.model_name(),
                tokens_used: outcome.usage.map(|u| u.total_tokens),
                duration_ms: outcome.duration_ms,
            },
            prompt,
        }
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = String::new();
                output.push_str(&result.response);

                if !result.missing.is_empty() {
                    output.push_str(&format!(
                        "\n\n--- Still missing ---\n{}\n",
                        result.missing.join(", ")
                    ));
                }

                if !result.errors.is_empty() {
                    output.push_str("\n--- Errors ---\n");
                    for error in &result.errors {
                        output.push_str(&format!("• {}\n", error));
                    }
                }

                output
            }
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## Response\n\n");
                output.push_str(&result.response);
                output.push_str("\n\n");

                output.push_str("## Preferences\n\n");
                for slot in SlotName::ALL {
                    let value = &result.slots[slot.as_str()];
                    output.push_str(&format!("- **{}**: {}\n", slot.label(), slot_text(value)));
                }
                output.push('\n');

                if !result.errors.is_empty() {
                    output.push_str("## Errors\n\n");
                    for error in &result.errors {
                        output.push_str(&format!("- {}\n", error));
                    }
                    output.push('\n');
                }

                output.push_str("---\n");
                output.push_str(&format!(
                    "*Model: {} | Intent: {} | Tokens: {} | Duration: {}ms*\n",
                    result.metadata.model,
                    result.intent,
                    result.metadata.tokens_used.unwrap_or(0),
                    result.metadata.duration_ms
                ));

                output
            }
        }
    }
}

fn slot_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => "_not yet known_".to_string(),
    }
}
