//! Error types for the noise crate.

use thiserror::Error;

/// Errors raised by noisy sampling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NoiseError {
    /// The statevector would not fit in memory.
    #[error("Cannot simulate {num_qubits} qubits, the sampler supports at most {max}")]
    TooManyQubits { num_qubits: u32, max: u32 },

    /// Sampling was requested with zero shots.
    #[error("Shot count must be positive")]
    InvalidShots,
}

/// Result type for noise operations.
pub type NoiseResult<T> = Result<T, NoiseError>;
