//! qforge algorithm templates
//!
//! A catalogue of parameterized circuit generators. Each template declares
//! typed parameters with defaults and bounds; parameter maps are validated
//! in full before a circuit is built, so callers see every problem at once.
//!
//! # Example
//!
//! ```rust
//! use qforge_algorithms::{Parameters, TemplateLibrary};
//!
//! let library = TemplateLibrary::builtin();
//!
//! let mut params = Parameters::new();
//! params.insert("layers".into(), (-5).into());
//! let report = library.validate_parameters("vqe_standard", &params).unwrap();
//! assert!(!report.valid);
//! assert_eq!(report.errors[0].field, "layers");
//!
//! let circuit = library.generate_circuit("bell_state", &Parameters::new()).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! ```
//!
//! # Templates
//!
//! | Id | Circuit |
//! |----|---------|
//! | `bell_state` | One of the four Bell pairs |
//! | `ghz_state` | n-qubit GHZ state |
//! | `vqe_standard` | Hardware-efficient ansatz with seeded angles |
//! | `qaoa_maxcut` | QAOA on a ring, line, complete or star graph |
//! | `qpe` | Phase estimation of a phase gate |
//! | `qft` | Forward or inverse Fourier transform |
//! | `grover` | Search for one marked basis state |

pub mod circuits;
pub mod error;
pub mod library;
pub mod parameter;
pub mod template;
pub mod validation;

pub use error::{AlgorithmError, AlgorithmResult};
pub use library::TemplateLibrary;
pub use parameter::{ParameterKind, ParameterSpec, ParameterValue, Parameters};
pub use template::{AlgorithmTemplate, Arguments, Category, CrossCheck, Difficulty, Generator};
pub use validation::{ValidationError, ValidationErrorKind, ValidationReport, validate};
