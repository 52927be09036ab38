//! High-level circuit builder API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit: a fixed number of qubits and classical bits plus an
/// ordered instruction list.
///
/// Every instruction is validated on insertion, so a `Circuit` never refers
/// to a qubit or classical bit it does not own. Equality is structural and
/// ignores the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CircuitRepr")]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

#[derive(Deserialize)]
struct CircuitRepr {
    #[serde(default = "default_name")]
    name: String,
    num_qubits: u32,
    #[serde(default)]
    num_clbits: u32,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

fn default_name() -> String {
    "circuit".into()
}

impl TryFrom<CircuitRepr> for Circuit {
    type Error = IrError;

    fn try_from(repr: CircuitRepr) -> IrResult<Self> {
        Circuit::from_instructions(repr.name, repr.num_qubits, repr.num_clbits, repr.instructions)
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits
            && self.num_clbits == other.num_clbits
            && self.instructions == other.instructions
    }
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(IrError::EmptyCircuit);
        }
        Ok(Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        })
    }

    /// Build a circuit from a prepared instruction list, validating each one.
    pub fn from_instructions(
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_size(name, num_qubits, num_clbits)?;
        for inst in instructions {
            circuit.push(inst)?;
        }
        Ok(circuit)
    }

    /// Append an instruction after checking its operands.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());
        if let InstructionKind::Gate(gate) = &instruction.kind {
            if instruction.qubits.len() != gate.num_qubits() as usize {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got: u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX),
                });
            }
        }
        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name,
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }
        if instruction.is_measure() && instruction.qubits.len() != instruction.clbits.len() {
            return Err(IrError::MeasureArityMismatch {
                qubits: instruction.qubits.len(),
                clbits: instruction.clbits.len(),
            });
        }
        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit,
                    num_clbits: self.num_clbits,
                });
            }
        }
        Ok(())
    }

    /// Apply a gate to the given qubits.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let inst = Instruction::gate(gate, qubits)?;
        self.push(inst)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Z, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::S, [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Sdg, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::T, [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Tdg, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::SX, [qubit])
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta), [qubit])
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta), [qubit])
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta), [qubit])
    }

    /// Apply phase gate.
    pub fn u1(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::U1(lambda), [qubit])
    }

    /// Apply universal U3(θ, φ, λ) gate.
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::U3(theta, phi, lambda), [qubit])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [q1, q2])
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CP(lambda), [control, target])
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ(theta), [q1, q2])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit into the classical bit with the same index,
    /// growing the classical register when it is too small.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for i in 0..self.num_qubits {
            self.push(Instruction::measure(QubitId(i), ClbitId(i)))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Add a barrier on the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Add a barrier across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let all = self.qubits().collect::<Vec<_>>();
        self.barrier(all)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Iterate over qubit identifiers.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + use<> {
        (0..self.num_qubits).map(QubitId)
    }

    /// All instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Gate instructions only, in program order.
    pub fn gates(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(|i| i.is_gate())
    }

    /// Measurement instructions only, in program order.
    pub fn measurements(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(|i| i.is_measure())
    }

    /// Number of gate instructions.
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    /// Number of gates acting on two or more qubits.
    pub fn two_qubit_gate_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.is_multi_qubit_gate())
            .count()
    }

    /// True when the circuit contains at least one measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Operation counts by name, sorted by name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Circuit depth: the length of the longest chain of operations sharing
    /// a qubit or classical bit. Barriers align wires without adding a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits as usize];
        let mut clbit_level = vec![0usize; self.num_clbits as usize];
        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_level[c.index()]))
                .max()
                .unwrap_or(0);
            let level = if inst.is_barrier() { start } else { start + 1 };
            for q in &inst.qubits {
                qubit_level[q.index()] = level;
            }
            for c in &inst.clbits {
                clbit_level[c.index()] = level;
            }
        }
        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }

    /// Qubits touched by at least one non-barrier instruction.
    pub fn active_qubits(&self) -> usize {
        let mut active = vec![false; self.num_qubits as usize];
        for inst in self.instructions.iter().filter(|i| !i.is_barrier()) {
            for q in &inst.qubits {
                active[q.index()] = true;
            }
        }
        active.into_iter().filter(|a| *a).count()
    }

    // =========================================================================
    // DAG conversion
    // =========================================================================

    /// Build the DAG form of this circuit.
    pub fn to_dag(&self) -> IrResult<CircuitDag> {
        let mut dag = CircuitDag::with_size(self.num_qubits, self.num_clbits);
        for inst in &self.instructions {
            dag.apply(inst.clone())?;
        }
        Ok(dag)
    }

    /// Rebuild a circuit from a DAG in deterministic topological order.
    pub fn from_dag(name: impl Into<String>, dag: &CircuitDag) -> IrResult<Self> {
        Self::from_instructions(
            name,
            dag.num_qubits(),
            dag.num_clbits(),
            dag.topological_ops()?.into_iter().map(|(_, inst)| inst.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn bell() -> Circuit {
        let mut c = Circuit::with_size("bell", 2, 2).unwrap();
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c.measure_all().unwrap();
        c
    }

    #[test]
    fn test_bell_circuit() {
        let c = bell();
        assert_eq!(c.num_qubits(), 2);
        assert_eq!(c.gate_count(), 2);
        assert_eq!(c.measurements().count(), 2);
        assert_eq!(c.two_qubit_gate_count(), 1);
        assert_eq!(c.depth(), 3);
        assert!(c.has_measurements());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            Circuit::with_size("empty", 0, 0),
            Err(IrError::EmptyCircuit)
        ));
    }

    #[test]
    fn test_out_of_range_qubit_rejected() {
        let mut c = Circuit::with_size("c", 2, 0).unwrap();
        let err = c.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { num_qubits: 2, .. }));
        assert_eq!(c.gate_count(), 0);
    }

    #[test]
    fn test_out_of_range_clbit_rejected() {
        let mut c = Circuit::with_size("c", 2, 1).unwrap();
        assert!(matches!(
            c.measure(QubitId(1), ClbitId(1)),
            Err(IrError::ClbitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_measure_all_grows_classical_register() {
        let mut c = Circuit::with_size("c", 3, 0).unwrap();
        c.measure_all().unwrap();
        assert_eq!(c.num_clbits(), 3);
    }

    #[test]
    fn test_depth_parallel_gates() {
        let mut c = Circuit::with_size("c", 4, 0).unwrap();
        c.h(QubitId(0)).unwrap();
        c.h(QubitId(1)).unwrap();
        c.cx(QubitId(2), QubitId(3)).unwrap();
        assert_eq!(c.depth(), 1);
        c.cx(QubitId(1), QubitId(2)).unwrap();
        assert_eq!(c.depth(), 2);
    }

    #[test]
    fn test_barrier_does_not_add_depth() {
        let mut c = Circuit::with_size("c", 2, 0).unwrap();
        c.h(QubitId(0)).unwrap();
        c.barrier_all().unwrap();
        c.h(QubitId(1)).unwrap();
        assert_eq!(c.depth(), 2);
    }

    #[test]
    fn test_count_ops() {
        let mut c = bell();
        c.rz(PI, QubitId(1)).unwrap();
        let ops = c.count_ops();
        assert_eq!(ops["h"], 1);
        assert_eq!(ops["measure"], 2);
        assert_eq!(ops["rz"], 1);
    }

    #[test]
    fn test_equality_ignores_name() {
        let mut a = bell();
        let b = bell();
        a.set_name("other");
        assert_eq!(a, b);
    }

    #[test]
    fn test_dag_round_trip() {
        let c = bell();
        let dag = c.to_dag().unwrap();
        let back = Circuit::from_dag("bell", &dag).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_json_round_trip_validates() {
        let c = bell();
        let json = serde_json::to_string(&c).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let bad = r#"{"name":"bad","num_qubits":1,"instructions":[{"kind":{"gate":"X"},"qubits":[3]}]}"#;
        assert!(serde_json::from_str::<Circuit>(bad).is_err());
    }
}
