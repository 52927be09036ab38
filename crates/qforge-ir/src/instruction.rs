//! Circuit instructions combining gates with operands.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(StandardGate),
    /// Measurement of each qubit into the matching classical bit.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on, controls first.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes (measure only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    ///
    /// Fails when the number of qubits differs from the gate's arity or a
    /// qubit appears twice.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        let expected = gate.num_qubits();
        if qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got: u32::try_from(qubits.len()).unwrap_or(u32::MAX),
            });
        }
        check_distinct(&qubits, Some(gate.name()))?;
        Ok(Self {
            kind: InstructionKind::Gate(gate),
            qubits,
            clbits: vec![],
        })
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction.
    pub fn measure_many(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasureArityMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        check_distinct(&qubits, None)?;
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// The gate, if this is a gate instruction.
    #[inline]
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Check if this is a gate instruction.
    #[inline]
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    #[inline]
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a barrier.
    #[inline]
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// True for gates acting on exactly one qubit.
    pub fn is_single_qubit_gate(&self) -> bool {
        self.as_gate().is_some_and(|g| g.num_qubits() == 1)
    }

    /// True for gates acting on two or more qubits.
    pub fn is_multi_qubit_gate(&self) -> bool {
        self.as_gate().is_some_and(|g| g.num_qubits() >= 2)
    }

    /// Instruction name as it appears in QASM.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }
}

fn check_distinct(qubits: &[QubitId], gate_name: Option<&str>) -> IrResult<()> {
    let mut seen = FxHashSet::default();
    for &qubit in qubits {
        if !seen.insert(qubit) {
            return Err(IrError::DuplicateQubit {
                qubit,
                gate_name: gate_name.map(str::to_string),
            });
        }
    }
    Ok(())
}
