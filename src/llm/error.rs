use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by LLM completion providers.
pub enum LlmError {
    /// The upstream provider call failed.
    #[error("completion provider failed: {message}")]
    Provider {
        /// Error message.
        message: String,
    },

    /// The call exceeded its timeout.
    #[error("completion timed out after {seconds}s")]
    Timeout {
        /// Timeout that elapsed.
        seconds: u64,
    },

    /// The provider returned an empty completion.
    #[error("completion was empty")]
    EmptyCompletion,
}
