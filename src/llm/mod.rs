//! LLM completion provider interface and genai-backed client.

pub mod client;
pub mod error;
pub mod mock;
pub mod provider;

pub use client::GenaiProvider;
pub use error::LlmError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompletionProvider;
pub use provider::{Completion, CompletionProvider};
