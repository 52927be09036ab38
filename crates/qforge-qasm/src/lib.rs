//! `OpenQASM` 2.0 parser and emitter for qforge.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version header | ✅ | `OPENQASM 2.0;` |
//! | Includes | ✅ (ignored) | `include "qelib1.inc";` |
//! | Registers | ✅ | `qreg q[5];`, `creg c[5];` |
//! | Standard gates | ✅ | `h q[0];`, `cx q[0], q[1];` |
//! | Parameterized gates | ✅ | `rx(pi/4) q[0];`, `u3(0.1, 0, sqrt(2)) q[1];` |
//! | Register broadcast | ✅ | `h q;`, `measure q -> c;` |
//! | Gate definitions | ✅ (inlined) | `gate bell a, b { h a; cx a, b; }` |
//! | Barriers and reset | ✅ | `barrier q;`, `reset q[0];` |
//! | Classical control | ❌ | `if (c == 1) x q[0];` |
//!
//! # Example: Parsing QASM
//!
//! ```rust
//! use qforge_qasm::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0],q[1];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.gate_count(), 2);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use qforge_ir::{Circuit, QubitId};
//! use qforge_qasm::{emit, parse};
//!
//! let mut circuit = Circuit::with_size("demo", 2, 0).unwrap();
//! circuit.h(QubitId(0)).unwrap().rz(0.25, QubitId(1)).unwrap();
//!
//! let qasm = emit(&circuit);
//! assert!(qasm.contains("rz(0.25) q[1];"));
//! assert_eq!(parse(&qasm).unwrap(), circuit);
//! ```

pub mod ast;
mod emitter;
pub mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_ast};
pub use parser::lowering::PARSED_CIRCUIT_NAME;
