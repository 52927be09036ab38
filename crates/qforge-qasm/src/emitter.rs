//! QASM 2.0 emitter for serializing circuits.

use qforge_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId, StandardGate};
use std::f64::consts::PI;

/// Largest denominator tried when printing an angle as a multiple of π.
const MAX_PI_DENOMINATOR: i64 = 16;

/// Largest numerator tried when printing an angle as a multiple of π.
const MAX_PI_NUMERATOR: i64 = 64;

/// Emit a circuit as QASM 2.0 source code.
///
/// Registers are emitted as a single `qreg q[n];` and, when the circuit has
/// classical bits, a single `creg c[m];`. Angles are written either as an
/// exact multiple of `pi` or with enough digits to parse back to the same
/// `f64`, so `parse(&emit(&c))` reproduces `c`.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit);
    emitter.output
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln("");

        self.writeln(&format!("qreg q[{}];", circuit.num_qubits()));
        if circuit.num_clbits() > 0 {
            self.writeln(&format!("creg c[{}];", circuit.num_clbits()));
        }
        self.writeln("");

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        let qubits = emit_qubits(&instruction.qubits);
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let line = match emit_params(gate) {
                    Some(params) => format!("{}({params}) {qubits};", gate.name()),
                    None => format!("{} {qubits};", gate.name()),
                };
                self.writeln(&line);
            }
            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    self.writeln(&format!("measure {} -> {};", emit_qubit(*q), emit_clbit(*c)));
                }
            }
            InstructionKind::Reset => {
                for q in &instruction.qubits {
                    self.writeln(&format!("reset {};", emit_qubit(*q)));
                }
            }
            InstructionKind::Barrier => {
                // QASM 2.0 has no operand-free barrier.
                if !instruction.qubits.is_empty() {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_params(gate: &StandardGate) -> Option<String> {
    let params = gate.params();
    if params.is_empty() {
        return None;
    }
    Some(
        params
            .iter()
            .map(|p| format_angle(*p))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn emit_qubit(q: QubitId) -> String {
    format!("q[{}]", q.0)
}

fn emit_clbit(c: ClbitId) -> String {
    format!("c[{}]", c.0)
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| emit_qubit(*q))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format an angle so that the parser evaluates it back to the same bits.
///
/// Exact rational multiples of π are written symbolically. The symbolic form
/// is only used when `(n * pi) / d` reproduces the value exactly, which is the
/// order in which the parser evaluates `n*pi/d`.
pub(crate) fn format_angle(value: f64) -> String {
    if value != 0.0 && value.is_finite() {
        for d in 1..=MAX_PI_DENOMINATOR {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let n = (value * d as f64 / PI).round() as i64;
            if n == 0 || n.abs() > MAX_PI_NUMERATOR {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let candidate = (n as f64 * PI) / d as f64;
            if candidate.to_bits() == value.to_bits() {
                return pi_fraction(n, d);
            }
        }
    }
    // Debug formatting is the shortest representation that round-trips.
    format!("{value:?}")
}

fn pi_fraction(n: i64, d: i64) -> String {
    let sign = if n < 0 { "-" } else { "" };
    let numerator = match n.abs() {
        1 => "pi".to_string(),
        k => format!("{k}*pi"),
    };
    if d == 1 {
        format!("{sign}{numerator}")
    } else {
        format!("{sign}{numerator}/{d}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_emit_bell() {
        let mut circuit = Circuit::with_size("bell", 2, 2).unwrap();
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure_all().unwrap();

        let qasm = emit(&circuit);
        assert!(qasm.starts_with("OPENQASM 2.0;\ninclude \"qelib1.inc\";"));
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("creg c[2];"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("measure q[1] -> c[1];"));
    }

    #[test]
    fn test_no_creg_without_clbits() {
        let circuit = Circuit::with_size("empty", 3, 0).unwrap();
        let qasm = emit(&circuit);
        assert!(!qasm.contains("creg"));
        assert_eq!(parse(&qasm).unwrap(), circuit);
    }

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(PI), "pi");
        assert_eq!(format_angle(-PI / 2.0), "-pi/2");
        assert_eq!(format_angle(3.0 * PI / 4.0), "3*pi/4");
        assert_eq!(format_angle(2.0 * PI), "2*pi");
        assert_eq!(format_angle(0.0), "0.0");
        assert_eq!(format_angle(0.1), "0.1");
        assert_eq!(format_angle(1e-12), "1e-12");
    }

    #[test]
    fn test_angles_survive_round_trip() {
        let angles = [0.1, -0.25, PI / 3.0, -7.0 * PI / 8.0, 1e-12, 123_456.789, 1.0 / 3.0];
        let mut circuit = Circuit::with_size("angles", 1, 0).unwrap();
        for a in angles {
            circuit.rz(a, QubitId(0)).unwrap();
        }
        circuit.u3(0.3, -PI, 2.0 * PI / 3.0, QubitId(0)).unwrap();
        let parsed = parse(&emit(&circuit)).unwrap();
        assert_eq!(parsed, circuit);
    }

    #[test]
    fn test_barrier_and_reset() {
        let mut circuit = Circuit::with_size("misc", 2, 0).unwrap();
        circuit.barrier_all().unwrap().reset(QubitId(1)).unwrap();
        let qasm = emit(&circuit);
        assert!(qasm.contains("barrier q[0], q[1];"));
        assert!(qasm.contains("reset q[1];"));
        assert_eq!(parse(&qasm).unwrap(), circuit);
    }
}
