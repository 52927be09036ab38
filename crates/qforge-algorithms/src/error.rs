//! Error types for the template library.

use qforge_ir::IrError;
use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors raised while looking up templates or generating circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgorithmError {
    /// No template has this id.
    #[error("Unknown algorithm template '{0}'")]
    UnknownTemplate(String),

    /// The parameter map broke one or more declared constraints.
    #[error("Invalid template parameters: {0}")]
    Validation(ValidationReport),

    /// Building the circuit failed.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for template operations.
pub type AlgorithmResult<T> = Result<T, AlgorithmError>;
