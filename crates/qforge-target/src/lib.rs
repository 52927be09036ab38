//! Provider constraint profiles for qforge.
//!
//! A [`ProviderConstraints`] describes what a hardware provider accepts
//! (width, depth, gate count, native gates) and how noisy it is (gate,
//! readout and crosstalk error rates, coherence times, gate durations).
//! The optimizer uses the native gate set for transpilation and the noise
//! figures feed fidelity estimation.
//!
//! # Example
//!
//! ```rust
//! use qforge_target::{ProviderRegistry, NoiseLevel};
//!
//! let registry = ProviderRegistry::builtin();
//! let ibm = registry.get("ibm_quantum");
//! assert!(ibm.native_gates.contains("cx"));
//!
//! // Unknown providers resolve to the default profile.
//! let unknown = registry.get("someone_else");
//! assert_eq!(unknown.id, "generic");
//! assert_eq!(unknown.noise_level, NoiseLevel::Medium);
//! ```

pub mod error;
pub mod gate_set;
pub mod provider;
pub mod registry;

pub use error::{TargetError, TargetResult};
pub use gate_set::GateSet;
pub use provider::{NoiseLevel, ProviderConstraints};
pub use registry::{DEFAULT_PROVIDER, ProviderRegistry};
