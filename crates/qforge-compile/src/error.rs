//! Error types for compilation.

use qforge_ir::IrError;
use qforge_target::TargetError;
use thiserror::Error;

/// Errors raised while optimizing or transpiling a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The circuit or DAG was malformed.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// No chain of rewrite rules reaches the provider's native gates.
    #[error("Gate '{gate}' has no decomposition into the native gates of provider '{provider}'")]
    UnsupportedGate { gate: String, provider: String },

    /// A pass name was not recognised.
    #[error("Unknown optimization pass '{0}'")]
    UnknownPass(String),

    /// Provider lookup failed with fallback disabled.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// Options that cannot be combined.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
