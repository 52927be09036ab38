//! AST-to-Circuit lowering for QASM 2.0.
//!
//! Registers are flattened in declaration order, register operands are
//! broadcast, and user gate definitions are expanded inline down to the
//! built-in gate vocabulary.

use qforge_ir::{
    Circuit, ClbitId, Instruction, IrError, QubitId, StandardGate, canonical_name,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::f64::consts::PI;

use crate::ast::{BinOp, Expression, GateCall, GateDef, Operand, Program, Statement};
use crate::error::{ParseError, ParseResult};

/// Name given to circuits produced by the parser.
pub const PARSED_CIRCUIT_NAME: &str = "qasm_circuit";

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::default();
    for stmt in &program.statements {
        lowerer.lower_statement(stmt)?;
    }
    let circuit = Circuit::from_instructions(
        PARSED_CIRCUIT_NAME,
        lowerer.num_qubits,
        lowerer.num_clbits,
        lowerer.instructions,
    )?;
    Ok(circuit)
}

/// A flattened register: first index and length.
#[derive(Debug, Clone, Copy)]
struct Register {
    start: u32,
    size: u32,
}

/// Lowers AST to Circuit.
#[derive(Default)]
struct Lowerer<'a> {
    qregs: FxHashMap<String, Register>,
    cregs: FxHashMap<String, Register>,
    gates: FxHashMap<String, &'a GateDef>,
    opaque: FxHashSet<String>,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl<'a> Lowerer<'a> {
    fn lower_statement(&mut self, stmt: &'a Statement) -> ParseResult<()> {
        match stmt {
            Statement::Include { .. } => Ok(()),
            Statement::QReg { name, size, line } => {
                let reg = self.declare(name, *size, *line, true)?;
                self.qregs.insert(name.clone(), reg);
                Ok(())
            }
            Statement::CReg { name, size, line } => {
                let reg = self.declare(name, *size, *line, false)?;
                self.cregs.insert(name.clone(), reg);
                Ok(())
            }
            Statement::GateDef(def) => self.define_gate(def),
            Statement::Opaque { name, line, .. } => {
                if self.gates.contains_key(name) || !self.opaque.insert(name.clone()) {
                    return Err(ParseError::DuplicateDefinition {
                        name: name.clone(),
                        line: *line,
                    });
                }
                Ok(())
            }
            Statement::Gate(call) => self.lower_gate_call(call),
            Statement::Measure { qubit, bit, line } => {
                let qubits = self.resolve_qubits(qubit, *line)?;
                let clbits = self.resolve_clbits(bit, *line)?;
                if qubit.index.is_some() != bit.index.is_some() || qubits.len() != clbits.len() {
                    return Err(ParseError::RegisterSizeMismatch {
                        message: format!(
                            "cannot measure {} qubit(s) into {} bit(s)",
                            qubits.len(),
                            clbits.len()
                        ),
                        line: *line,
                    });
                }
                for (q, c) in qubits.into_iter().zip(clbits) {
                    self.instructions.push(Instruction::measure(q, c));
                }
                Ok(())
            }
            Statement::Reset { operand, line } => {
                for q in self.resolve_qubits(operand, *line)? {
                    self.instructions.push(Instruction::reset(q));
                }
                Ok(())
            }
            Statement::Barrier { operands, line } => {
                let mut qubits = Vec::new();
                for operand in operands {
                    for q in self.resolve_qubits(operand, *line)? {
                        if !qubits.contains(&q) {
                            qubits.push(q);
                        }
                    }
                }
                self.instructions.push(Instruction::barrier(qubits));
                Ok(())
            }
            Statement::If { line } => Err(ParseError::Unsupported {
                construct: "classically conditioned operation".into(),
                line: *line,
            }),
        }
    }

    fn declare(
        &mut self,
        name: &str,
        size: u64,
        line: usize,
        quantum: bool,
    ) -> ParseResult<Register> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateDefinition {
                name: name.to_string(),
                line,
            });
        }
        let size = u32::try_from(size)
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| ParseError::InvalidNumber {
                message: format!("register '{name}' has invalid size {size}"),
                line,
            })?;
        let counter = if quantum {
            &mut self.num_qubits
        } else {
            &mut self.num_clbits
        };
        let reg = Register {
            start: *counter,
            size,
        };
        *counter = counter
            .checked_add(size)
            .ok_or_else(|| ParseError::InvalidNumber {
                message: "too many bits declared".into(),
                line,
            })?;
        Ok(reg)
    }

    fn define_gate(&mut self, def: &'a GateDef) -> ParseResult<()> {
        // Definitions of built-in gates (e.g. a pasted qelib1.inc) describe
        // the same operation, so the built-in wins.
        if canonical_name(&def.name).is_some() {
            return Ok(());
        }
        if self.gates.contains_key(&def.name) || self.opaque.contains(&def.name) {
            return Err(ParseError::DuplicateDefinition {
                name: def.name.clone(),
                line: def.line,
            });
        }
        for op in &def.body {
            if canonical_name(&op.name).is_none() && !self.gates.contains_key(&op.name) {
                return Err(ParseError::UnknownGate {
                    name: op.name.clone(),
                    line: op.line,
                });
            }
            if let Some(arg) = op.args.iter().find(|a| !def.qubits.contains(a)) {
                return Err(ParseError::UndefinedRegister {
                    name: arg.clone(),
                    line: op.line,
                });
            }
        }
        self.gates.insert(def.name.clone(), def);
        Ok(())
    }

    fn lower_gate_call(&mut self, call: &GateCall) -> ParseResult<()> {
        let env = FxHashMap::default();
        let params = call
            .params
            .iter()
            .map(|p| evaluate(p, &env, call.line))
            .collect::<ParseResult<Vec<_>>>()?;

        let operands = call
            .args
            .iter()
            .map(|arg| Ok((arg.index.is_none(), self.resolve_qubits(arg, call.line)?)))
            .collect::<ParseResult<Vec<_>>>()?;

        // Broadcast register operands: all registers must have equal size and
        // indexed operands are repeated.
        let mut width = None;
        for (is_register, qubits) in &operands {
            if *is_register {
                match width {
                    None => width = Some(qubits.len()),
                    Some(w) if w != qubits.len() => {
                        return Err(ParseError::RegisterSizeMismatch {
                            message: format!(
                                "gate '{}' applied to registers of size {w} and {}",
                                call.name,
                                qubits.len()
                            ),
                            line: call.line,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for i in 0..width.unwrap_or(1) {
            let qubits: Vec<QubitId> = operands
                .iter()
                .map(|(is_register, qs)| if *is_register { qs[i] } else { qs[0] })
                .collect();
            self.expand(&call.name, &params, &qubits, call.line)?;
        }
        Ok(())
    }

    /// Expand one application of `name` down to built-in gates.
    fn expand(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[QubitId],
        line: usize,
    ) -> ParseResult<()> {
        if canonical_name(name).is_some() {
            let gate = StandardGate::from_name(name, params).map_err(|e| match e {
                IrError::ParameterCountMismatch {
                    gate_name,
                    expected,
                    got,
                } => ParseError::WrongParameterCount {
                    gate: gate_name,
                    expected,
                    got,
                    line,
                },
                other => ParseError::Ir(other),
            })?;
            if qubits.len() != gate.num_qubits() as usize {
                return Err(ParseError::WrongQubitCount {
                    gate: gate.name().to_string(),
                    expected: gate.num_qubits() as usize,
                    got: qubits.len(),
                    line,
                });
            }
            self.instructions
                .push(Instruction::gate(gate, qubits.iter().copied())?);
            return Ok(());
        }

        let Some(def) = self.gates.get(name).copied() else {
            return Err(ParseError::UnknownGate {
                name: name.to_string(),
                line,
            });
        };
        if params.len() != def.params.len() {
            return Err(ParseError::WrongParameterCount {
                gate: name.to_string(),
                expected: def.params.len(),
                got: params.len(),
                line,
            });
        }
        if qubits.len() != def.qubits.len() {
            return Err(ParseError::WrongQubitCount {
                gate: name.to_string(),
                expected: def.qubits.len(),
                got: qubits.len(),
                line,
            });
        }

        let env: FxHashMap<&str, f64> = def
            .params
            .iter()
            .map(String::as_str)
            .zip(params.iter().copied())
            .collect();
        let wiring: FxHashMap<&str, QubitId> = def
            .qubits
            .iter()
            .map(String::as_str)
            .zip(qubits.iter().copied())
            .collect();

        for op in &def.body {
            let op_params = op
                .params
                .iter()
                .map(|p| evaluate(p, &env, line))
                .collect::<ParseResult<Vec<_>>>()?;
            let op_qubits = op
                .args
                .iter()
                .map(|a| {
                    wiring
                        .get(a.as_str())
                        .copied()
                        .ok_or_else(|| ParseError::UndefinedRegister {
                            name: a.clone(),
                            line: op.line,
                        })
                })
                .collect::<ParseResult<Vec<_>>>()?;
            self.expand(&op.name, &op_params, &op_qubits, line)?;
        }
        Ok(())
    }

    fn resolve_qubits(&self, operand: &Operand, line: usize) -> ParseResult<Vec<QubitId>> {
        let reg = lookup(&self.qregs, operand, line)?;
        Ok(indices(reg, operand, line)?.map(QubitId).collect())
    }

    fn resolve_clbits(&self, operand: &Operand, line: usize) -> ParseResult<Vec<ClbitId>> {
        let reg = lookup(&self.cregs, operand, line)?;
        Ok(indices(reg, operand, line)?.map(ClbitId).collect())
    }
}

fn lookup(
    regs: &FxHashMap<String, Register>,
    operand: &Operand,
    line: usize,
) -> ParseResult<Register> {
    regs.get(&operand.register)
        .copied()
        .ok_or_else(|| ParseError::UndefinedRegister {
            name: operand.register.clone(),
            line,
        })
}

fn indices(reg: Register, operand: &Operand, line: usize) -> ParseResult<std::ops::Range<u32>> {
    match operand.index {
        None => Ok(reg.start..reg.start + reg.size),
        Some(index) if index < u64::from(reg.size) => {
            // index < size <= u32::MAX
            let i = reg.start + u32::try_from(index).unwrap_or(u32::MAX);
            Ok(i..i + 1)
        }
        Some(index) => Err(ParseError::IndexOutOfBounds {
            register: operand.register.clone(),
            index,
            size: reg.size,
            line,
        }),
    }
}

/// Evaluate a parameter expression to a finite number.
fn evaluate(expr: &Expression, env: &FxHashMap<&str, f64>, line: usize) -> ParseResult<f64> {
    let value = eval_inner(expr, env, line)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::InvalidNumber {
            message: format!("parameter evaluates to {value}"),
            line,
        })
    }
}

fn eval_inner(expr: &Expression, env: &FxHashMap<&str, f64>, line: usize) -> ParseResult<f64> {
    Ok(match expr {
        Expression::Number(v) => *v,
        Expression::Pi => PI,
        Expression::Identifier(name) => {
            *env.get(name.as_str())
                .ok_or_else(|| ParseError::UndefinedParameter {
                    name: name.clone(),
                    line,
                })?
        }
        Expression::Neg(inner) => -eval_inner(inner, env, line)?,
        Expression::Binary { op, left, right } => {
            let l = eval_inner(left, env, line)?;
            let r = eval_inner(right, env, line)?;
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Pow => l.powf(r),
            }
        }
        Expression::Call { func, arg } => func.apply(eval_inner(arg, env, line)?),
    })
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::parser::parse;
    use qforge_ir::{QubitId, StandardGate};
    use std::f64::consts::PI;

    fn gate_list(source: &str) -> Vec<(StandardGate, Vec<u32>)> {
        parse(source)
            .unwrap()
            .gates()
            .map(|i| (*i.as_gate().unwrap(), i.qubits.iter().map(|q| q.0).collect()))
            .collect()
    }

    #[test]
    fn test_register_broadcast() {
        let gates = gate_list("OPENQASM 2.0; qreg q[3]; h q;");
        assert_eq!(gates.len(), 3);
        assert_eq!(gates[2].1, vec![2]);
    }

    #[test]
    fn test_mixed_broadcast() {
        let gates = gate_list("OPENQASM 2.0; qreg a[1]; qreg b[2]; cx a[0], b;");
        assert_eq!(
            gates,
            vec![(StandardGate::CX, vec![0, 1]), (StandardGate::CX, vec![0, 2])]
        );
    }

    #[test]
    fn test_broadcast_size_mismatch() {
        let err = parse("OPENQASM 2.0; qreg a[2]; qreg b[3]; cx a, b;").unwrap_err();
        assert!(matches!(err, ParseError::RegisterSizeMismatch { .. }));
    }

    #[test]
    fn test_measure_register_size_mismatch() {
        let err = parse("OPENQASM 2.0; qreg q[2]; creg c[1]; measure q -> c;").unwrap_err();
        assert!(matches!(err, ParseError::RegisterSizeMismatch { .. }));
    }

    #[test]
    fn test_gate_definition_expands_inline() {
        let source = r"
            OPENQASM 2.0;
            qreg q[2];
            gate bell a, b { h a; cx a, b; }
            gate twist(theta) a { rz(theta / 2) a; rz(-theta) a; }
            bell q[1], q[0];
            twist(pi) q[0];
        ";
        let gates = gate_list(source);
        assert_eq!(
            gates,
            vec![
                (StandardGate::H, vec![1]),
                (StandardGate::CX, vec![1, 0]),
                (StandardGate::Rz(PI / 2.0), vec![0]),
                (StandardGate::Rz(-PI), vec![0]),
            ]
        );
    }

    #[test]
    fn test_nested_gate_definitions() {
        let source = r"
            OPENQASM 2.0;
            qreg q[3];
            gate pair a, b { cx a, b; }
            gate chain a, b, c { pair a, b; pair b, c; }
            chain q[0], q[1], q[2];
        ";
        let gates = gate_list(source);
        assert_eq!(gates.len(), 2);
        assert_eq!(gates[1].1, vec![1, 2]);
    }

    #[test]
    fn test_builtin_redefinition_is_ignored() {
        let gates = gate_list("OPENQASM 2.0; qreg q[1]; gate h a { x a; } h q[0];");
        assert_eq!(gates, vec![(StandardGate::H, vec![0])]);
    }

    #[test]
    fn test_unknown_gate() {
        let err = parse("OPENQASM 2.0;\nqreg q[1];\nfoo q[0];").unwrap_err();
        assert!(matches!(err, ParseError::UnknownGate { ref name, line: 3 } if name == "foo"));
    }

    #[test]
    fn test_opaque_gate_cannot_be_applied() {
        let err = parse("OPENQASM 2.0; qreg q[1]; opaque magic q; magic q[0];").unwrap_err();
        assert!(matches!(err, ParseError::UnknownGate { .. }));
    }

    #[test]
    fn test_definition_body_must_use_known_gates() {
        let err = parse("OPENQASM 2.0; gate g a { nope a; }").unwrap_err();
        assert!(matches!(err, ParseError::UnknownGate { .. }));
    }

    #[test]
    fn test_wrong_parameter_count() {
        let err = parse("OPENQASM 2.0; qreg q[1]; rx q[0];").unwrap_err();
        assert!(matches!(
            err,
            ParseError::WrongParameterCount { expected: 1, got: 0, .. }
        ));
    }

    #[test]
    fn test_wrong_qubit_count() {
        let err = parse("OPENQASM 2.0; qreg q[2]; cx q[0];").unwrap_err();
        assert!(matches!(err, ParseError::WrongQubitCount { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_duplicate_register() {
        let err = parse("OPENQASM 2.0; qreg q[1]; creg q[1];").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_undefined_register() {
        let err = parse("OPENQASM 2.0; qreg q[1]; h r[0];").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedRegister { ref name, .. } if name == "r"));
    }

    #[test]
    fn test_conditional_is_unsupported() {
        let err =
            parse("OPENQASM 2.0; qreg q[1]; creg c[1]; if (c == 1) x q[0];").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { .. }));
    }

    #[test]
    fn test_math_functions_and_division_by_zero() {
        let gates = gate_list("OPENQASM 2.0; qreg q[1]; rz(sqrt(4) * cos(0)) q[0];");
        assert_eq!(gates[0].0, StandardGate::Rz(2.0));
        let err = parse("OPENQASM 2.0; qreg q[1]; rz(1/0) q[0];").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_barrier_and_reset() {
        let circuit = parse("OPENQASM 2.0; qreg q[2]; barrier q, q[0]; reset q[1];").unwrap();
        let insts = circuit.instructions();
        assert!(insts[0].is_barrier());
        assert_eq!(insts[0].qubits, vec![QubitId(0), QubitId(1)]);
        assert_eq!(insts[1].name(), "reset");
    }

    #[test]
    fn test_no_qubits_is_an_error() {
        assert!(parse("OPENQASM 2.0; creg c[1];").is_err());
    }
}
