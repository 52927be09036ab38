//! qforge circuit intermediate representation
//!
//! The foundation of the qforge toolchain: every other crate produces or
//! consumes the types defined here.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`], one enum variant per gate with its angles
//! - **Instructions**: [`Instruction`] combining a gate or measurement with operands
//! - **Circuit**: [`Circuit`], the validated instruction list with builder methods
//! - **DAG**: [`CircuitDag`], the wire graph used by optimization passes
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qforge_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.gate_count(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameters |
//! |------|--------|------------|
//! | `id`, `x`, `y`, `z`, `h` | 1 | - |
//! | `s`, `sdg`, `t`, `tdg`, `sx`, `sxdg` | 1 | - |
//! | `rx`, `ry`, `rz`, `u1` | 1 | θ |
//! | `u2` | 1 | φ, λ |
//! | `u3` | 1 | θ, φ, λ |
//! | `cx`, `cy`, `cz`, `ch`, `swap` | 2 | - |
//! | `crz`, `cp`, `rzz` | 2 | θ |
//! | `ccx`, `cswap` | 3 | - |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ANGLE_TOLERANCE, GATE_NAMES, Matrix2, StandardGate, angle_is_zero, canonical_name};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
