//! qforge circuit optimizer
//!
//! Rewrites circuits for a target provider through a pipeline of passes,
//! reporting what each pass changed.
//!
//! # Architecture
//!
//! ```text
//! Circuit (caller's, untouched)
//!       │ clone → CircuitDag
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (provider, one-qubit basis, rule depth)
//! └─────────────┘
//!       │
//!       ├── ProviderTranspilation
//!       ├── GateMerging
//!       └── GateCancellation
//!       │
//!       ▼
//! OptimizationResult (circuit, impact, per-pass reports, limit violations)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qforge_compile::optimize;
//! use qforge_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0).unwrap();
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let result = optimize(&circuit, "ibm_quantum", &["transpile", "merge", "cancel"]).unwrap();
//! for inst in result.optimized_circuit.gates() {
//!     assert!(["rz", "sx", "x", "cx", "id"].contains(&inst.name()));
//! }
//! assert_eq!(result.passes.len(), 3);
//! ```
//!
//! # Passes
//!
//! | Name | Alias | Effect |
//! |------|-------|--------|
//! | `gate_cancellation` | `cancel` | Removes identities and adjacent inverse pairs |
//! | `gate_merging` | `merge` | Folds single-qubit runs, sums same-axis rotations |
//! | `provider_transpilation` | `transpile` | Rewrites into the provider's native gates |
//!
//! Custom passes implement [`Pass`] and run through a [`PassManager`].

pub mod error;
pub mod manager;
pub mod optimizer;
pub mod pass;
pub mod property;
pub mod report;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::PassManager;
pub use optimizer::{OptimizationResult, Optimizer, PassName, optimize};
pub use pass::Pass;
pub use property::{DEFAULT_MAX_RULE_DEPTH, PropertySet, basis_for};
pub use report::{CircuitMetrics, Impact, PassReport};
pub use unitary::{OneQubitBasis, Unitary2x2};
