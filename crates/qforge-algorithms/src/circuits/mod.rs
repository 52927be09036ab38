//! Circuit generators behind the built-in templates.

pub mod entanglement;
pub mod fourier;
pub mod grover;
pub mod qaoa;
pub mod vqe;

pub use entanglement::{BellVariant, bell_state, ghz_state};
pub use fourier::{append_qft, qft, qpe};
pub use grover::{grover, optimal_iterations};
pub use qaoa::{GraphKind, cut_value, qaoa_circuit, qaoa_maxcut};
pub use vqe::{Entanglement, hardware_efficient_ansatz, num_parameters, vqe_ansatz};

/// Bit `index` of `value`; bits past the width read as zero.
pub(crate) fn bit(value: u64, index: u32) -> bool {
    value.checked_shr(index).is_some_and(|v| v & 1 == 1)
}

/// `2^k` as a float, saturating to infinity instead of overflowing.
pub(crate) fn pow2(k: usize) -> f64 {
    2f64.powi(i32::try_from(k).unwrap_or(i32::MAX))
}
