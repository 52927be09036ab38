//! Noise modelling for qforge circuits.
//!
//! Three views of how a circuit fares on real hardware:
//!
//! - **Fidelity estimation**: [`estimate`] and [`NoiseModeler`] multiply
//!   gate, decoherence, crosstalk and readout terms into one success
//!   probability in `(0, 1]`.
//! - **Mitigation advice**: [`NoiseModeler::get_error_mitigation_strategies`]
//!   lists the techniques whose [`Condition`]s hold for the circuit.
//! - **Noisy sampling**: [`NoisySampler`] runs a statevector simulation and
//!   draws shots with the provider's noise applied.
//!
//! # Example
//!
//! ```rust
//! use qforge_ir::{Circuit, QubitId};
//! use qforge_noise::NoiseModeler;
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! let modeler = NoiseModeler::default();
//! let estimate = modeler.estimate_fidelity(&circuit, "ionq");
//! assert!(estimate.overall_fidelity > 0.0 && estimate.overall_fidelity <= 1.0);
//!
//! let strategies = modeler.get_error_mitigation_strategies(&circuit, "ionq");
//! assert!(strategies.iter().any(|s| s.name == "Readout Error Mitigation"));
//! ```

pub mod error;
pub mod fidelity;
pub mod mitigation;
pub mod sampler;
pub mod schedule;
pub mod statevector;

pub use error::{NoiseError, NoiseResult};
pub use fidelity::{FidelityEstimate, MIN_FIDELITY, NoiseModeler, estimate};
pub use mitigation::{Condition, MitigationMetrics, MitigationStrategy, Technique, recommend};
pub use sampler::{Counts, DEFAULT_MAX_QUBITS, NoisySampler};
pub use schedule::Schedule;
pub use statevector::Statevector;
