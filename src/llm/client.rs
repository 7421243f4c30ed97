use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatOptions, ChatRequest};
use tracing::{error, info};

use super::error::LlmError;
use super::provider::{Completion, CompletionProvider};

/// Multi-provider LLM client backed by `genai`.
///
/// The model string selects the provider (`gpt-*`, `claude-*`, ...);
/// credentials come from the provider's usual environment variables.
pub struct GenaiProvider {
    client: Client,
    model: String,
}

impl GenaiProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for GenaiProvider {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let request = ChatRequest::from_user(prompt);
        let options = ChatOptions::default()
            .with_temperature(f64::from(temperature))
            .with_max_tokens(max_tokens);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "Provider request failed");
                LlmError::Provider {
                    message: e.to_string(),
                }
            })?;

        let text = response
            .first_text()
            .map(|t| t.to_string())
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        // genai does not surface a finish reason; an output that stops right
        // at the token cap is the practical truncation signal.
        let finish_reason = if text.len() >= max_tokens as usize * 3 {
            Some("length".to_string())
        } else {
            Some("stop".to_string())
        };

        info!(
            model = %self.model,
            input_chars = prompt.len(),
            output_chars = text.len(),
            finish_reason = finish_reason.as_deref().unwrap_or("unknown"),
            "LLM call complete"
        );

        Ok(Completion {
            text,
            finish_reason,
        })
    }
}
