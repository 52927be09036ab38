//! Error types for provider lookup and profile loading.

use thiserror::Error;

/// Errors raised by the provider registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TargetError {
    /// Strict lookup of an id that is neither a profile nor an alias.
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    /// A loaded profile has out-of-range values.
    #[error("Invalid provider profile '{id}': {message}")]
    InvalidProfile { id: String, message: String },

    /// The profile document could not be deserialized.
    #[error("Failed to read provider profiles: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type for target operations.
pub type TargetResult<T> = Result<T, TargetError>;
