use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading or validating configuration.
pub enum ConfigError {
    /// An environment variable held a value that does not parse as a number.
    #[error("invalid numeric value for {var}: '{value}'")]
    InvalidNumber {
        /// Environment variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A value that must be strictly positive was zero.
    #[error("{var} must be greater than zero")]
    ZeroValue {
        /// Environment variable name.
        var: &'static str,
    },

    /// Similarity threshold outside the valid cosine range.
    #[error("similarity threshold {value} is outside [-1.0, 1.0]")]
    InvalidThreshold {
        /// Offending value.
        value: f32,
    },

    /// A required URL was empty.
    #[error("{var} must not be empty")]
    EmptyValue {
        /// Environment variable name.
        var: &'static str,
    },
}
