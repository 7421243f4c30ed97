use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::error::LlmError;
use super::provider::{Completion, CompletionProvider};

/// Scripted completion provider for tests.
///
/// Responses are consumed FIFO; when the script runs dry the provider
/// returns the default response, or an error if `fail_when_empty` is set.
#[derive(Default)]
pub struct MockCompletionProvider {
    script: Mutex<VecDeque<Result<Completion, String>>>,
    prompts: Mutex<Vec<String>>,
    fail_all: Mutex<bool>,
}

impl MockCompletionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful completion.
    pub fn push_text(&self, text: &str) {
        self.script
            .lock()
            .push_back(Ok(Completion::new(text).with_finish_reason("stop")));
    }

    /// Queues a completion with an explicit finish reason (e.g. `length`).
    pub fn push_completion(&self, completion: Completion) {
        self.script.lock().push_back(Ok(completion));
    }

    /// Queues a provider failure.
    pub fn push_error(&self, message: &str) {
        self.script.lock().push_back(Err(message.to_string()));
    }

    /// Makes every call fail regardless of the script.
    pub fn set_fail_all(&self, fail: bool) {
        *self.fail_all.lock() = fail;
    }

    /// Prompts observed so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(
        &self,
        prompt: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        self.prompts.lock().push(prompt.to_string());

        if *self.fail_all.lock() {
            return Err(LlmError::Provider {
                message: "mock provider forced failure".to_string(),
            });
        }

        match self.script.lock().pop_front() {
            Some(Ok(completion)) => Ok(completion),
            Some(Err(message)) => Err(LlmError::Provider { message }),
            None => Err(LlmError::Provider {
                message: "mock script exhausted".to_string(),
            }),
        }
    }
}
