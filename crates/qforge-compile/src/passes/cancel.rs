//! Gate cancellation.

use qforge_ir::{CircuitDag, Instruction, NodeIndex, QubitId, StandardGate, WireId};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;

/// Removes identity gates and adjacent pairs of mutually inverse gates.
///
/// Two gates are adjacent when the second is the next operation on every
/// qubit wire of the first. Pairs are removed until none remain, so running
/// the pass again changes nothing. Measurements, resets and barriers sit on
/// the wires and therefore block cancellation across them.
pub struct GateCancellation;

impl GateCancellation {
    /// One sweep in topological order. Returns the number of removed gates.
    fn sweep(dag: &mut CircuitDag) -> CompileResult<usize> {
        let order: Vec<NodeIndex> = dag.topological_ops()?.into_iter().map(|(n, _)| n).collect();
        let mut removed = 0;

        for node in order {
            let Some(inst) = dag.get_instruction(node) else {
                continue;
            };
            let Some(gate) = inst.as_gate().copied() else {
                continue;
            };
            if gate.is_identity() {
                dag.remove_op(node)?;
                removed += 1;
                continue;
            }
            if let Some(partner) = cancelling_partner(dag, node, inst, &gate) {
                dag.remove_op(node)?;
                dag.remove_op(partner)?;
                removed += 2;
            }
        }
        Ok(removed)
    }
}

/// The successor that undoes `inst`, if there is one.
fn cancelling_partner(
    dag: &CircuitDag,
    node: NodeIndex,
    inst: &Instruction,
    gate: &StandardGate,
) -> Option<NodeIndex> {
    let first = *inst.qubits.first()?;
    let next = dag.successor_on(node, WireId::Qubit(first))?;
    let all_wires_meet = inst
        .qubits
        .iter()
        .all(|q| dag.successor_on(node, WireId::Qubit(*q)) == Some(next));
    if !all_wires_meet {
        return None;
    }
    let other = dag.get_instruction(next)?;
    let other_gate = other.as_gate()?;
    (same_operands(gate, &inst.qubits, &other.qubits) && gate.cancels_with(other_gate))
        .then_some(next)
}

/// Operand lists that denote the same action, allowing for gate symmetries.
fn same_operands(gate: &StandardGate, a: &[QubitId], b: &[QubitId]) -> bool {
    if a == b {
        return true;
    }
    match gate {
        g if g.is_symmetric() => a.len() == b.len() && a.iter().all(|q| b.contains(q)),
        // Toffoli controls commute, as do Fredkin targets.
        StandardGate::CCX => a[2] == b[2] && a[0] == b[1] && a[1] == b[0],
        StandardGate::CSwap => a[0] == b[0] && a[1] == b[2] && a[2] == b[1],
        _ => false,
    }
}

impl Pass for GateCancellation {
    fn name(&self) -> &'static str {
        "gate_cancellation"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &PropertySet) -> CompileResult<()> {
        let mut total = 0;
        loop {
            let removed = Self::sweep(dag)?;
            if removed == 0 {
                break;
            }
            total += removed;
        }
        debug!("Gate cancellation removed {} gates", total);
        Ok(())
    }
}
