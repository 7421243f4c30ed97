use async_trait::async_trait;

use super::error::LlmError;

/// One LLM completion with the bookkeeping needed to diagnose truncation
/// without replaying the call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Raw completion text.
    pub text: String,
    /// Provider-reported finish reason, when available.
    pub finish_reason: Option<String>,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
        }
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}

/// Prompt → text completion interface.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Completes `prompt`. Implementations log input size, output size, and
    /// finish reason for every call.
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError>;
}
