//! Single-qubit gate merging.

use qforge_ir::{CircuitDag, InstructionKind, NodeIndex, StandardGate, WireId};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::unitary::{Unitary2x2, normalize_angle, product};

/// Merges runs of consecutive single-qubit gates on a wire.
///
/// A run whose product is the identity up to global phase disappears. A run
/// of rotations about one axis becomes a single rotation. Any other run is
/// resynthesised in the provider's one-qubit basis and replaced only when
/// that is shorter.
pub struct GateMerging;

/// A maximal run of single-qubit gates on one wire, in time order.
struct Run {
    nodes: Vec<NodeIndex>,
    gates: Vec<StandardGate>,
}

fn single_qubit_gate(dag: &CircuitDag, node: NodeIndex) -> Option<StandardGate> {
    let inst = dag.get_instruction(node)?;
    if inst.qubits.len() == 1 {
        inst.as_gate().copied()
    } else {
        None
    }
}

fn collect_runs(dag: &CircuitDag) -> CompileResult<Vec<Run>> {
    let mut runs = Vec::new();
    for (node, inst) in dag.topological_ops()? {
        let (Some(gate), [qubit]) = (inst.as_gate(), inst.qubits.as_slice()) else {
            continue;
        };
        let wire = WireId::Qubit(*qubit);
        let continues_run = dag
            .predecessor_on(node, wire)
            .is_some_and(|p| single_qubit_gate(dag, p).is_some());
        if continues_run {
            continue;
        }

        let mut run = Run {
            nodes: vec![node],
            gates: vec![*gate],
        };
        let mut cursor = node;
        while let Some(next) = dag.successor_on(cursor, wire) {
            let Some(g) = single_qubit_gate(dag, next) else {
                break;
            };
            run.nodes.push(next);
            run.gates.push(g);
            cursor = next;
        }
        runs.push(run);
    }
    Ok(runs)
}

/// Sum a run of rotations about a single axis, `None` for mixed runs.
fn merge_same_axis(gates: &[StandardGate]) -> Option<StandardGate> {
    let (first, rest) = gates.split_first()?;
    let mut total = match first {
        StandardGate::Rx(a) | StandardGate::Ry(a) | StandardGate::Rz(a) | StandardGate::U1(a) => *a,
        _ => return None,
    };
    for g in rest {
        match (first, g) {
            (StandardGate::Rx(_), StandardGate::Rx(a))
            | (StandardGate::Ry(_), StandardGate::Ry(a))
            | (StandardGate::Rz(_), StandardGate::Rz(a))
            | (StandardGate::U1(_), StandardGate::U1(a)) => total += a,
            _ => return None,
        }
    }
    let total = normalize_angle(total);
    Some(match first {
        StandardGate::Rx(_) => StandardGate::Rx(total),
        StandardGate::Ry(_) => StandardGate::Ry(total),
        StandardGate::Rz(_) => StandardGate::Rz(total),
        _ => StandardGate::U1(total),
    })
}

/// Replacement gates for a run, `None` to leave it alone.
fn replacement(run: &Run, properties: &PropertySet) -> Option<Vec<StandardGate>> {
    let unitary: Unitary2x2 = product(&run.gates)?;
    if unitary.is_identity() {
        return Some(vec![]);
    }
    if run.gates.len() < 2 {
        return None;
    }
    if let Some(merged) = merge_same_axis(&run.gates) {
        return Some(if merged.is_identity() { vec![] } else { vec![merged] });
    }
    let synthesized = properties.basis?.synthesize_unitary(&unitary);
    (synthesized.len() < run.gates.len()).then_some(synthesized)
}

impl Pass for GateMerging {
    fn name(&self) -> &'static str {
        "gate_merging"
    }

    fn run(&self, dag: &mut CircuitDag, properties: &PropertySet) -> CompileResult<()> {
        let mut merged_runs = 0;
        for run in collect_runs(dag)? {
            let Some(gates) = replacement(&run, properties) else {
                continue;
            };
            merged_runs += 1;
            for (i, node) in run.nodes.iter().enumerate() {
                match gates.get(i) {
                    Some(gate) => {
                        if let Some(inst) = dag.get_instruction_mut(*node) {
                            inst.kind = InstructionKind::Gate(*gate);
                        }
                    }
                    None => {
                        dag.remove_op(*node)?;
                    }
                }
            }
        }
        debug!("Gate merging rewrote {} runs", merged_runs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::{Circuit, QubitId};
    use qforge_target::ProviderConstraints;
    use std::f64::consts::PI;

    fn merge(circuit: &Circuit, provider: ProviderConstraints) -> Circuit {
        let mut dag = circuit.to_dag().unwrap();
        GateMerging
            .run(&mut dag, &PropertySet::for_provider(provider))
            .unwrap();
        Circuit::from_dag(circuit.name(), &dag).unwrap()
    }

    fn single_qubit_unitary(circuit: &Circuit) -> Unitary2x2 {
        let gates: Vec<StandardGate> =
            circuit.gates().filter_map(|i| i.as_gate().copied()).collect();
        product(&gates).unwrap()
    }

    #[test]
    fn test_rotations_sum() {
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.rz(0.25, QubitId(0)).unwrap().rz(0.5, QubitId(0)).unwrap().rz(0.25, QubitId(0)).unwrap();
        let out = merge(&c, ProviderConstraints::ibm_quantum());
        assert_eq!(out.gate_count(), 1);
        assert_eq!(out.instructions()[0].as_gate(), Some(&StandardGate::Rz(1.0)));
    }

    #[test]
    fn test_identity_run_removed() {
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.h(QubitId(0)).unwrap().s(QubitId(0)).unwrap();
        c.sdg(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        assert_eq!(merge(&c, ProviderConstraints::generic()).gate_count(), 0);

        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.rx(PI, QubitId(0)).unwrap().rx(PI, QubitId(0)).unwrap();
        assert_eq!(merge(&c, ProviderConstraints::generic()).gate_count(), 0);
    }

    #[test]
    fn test_mixed_run_resynthesized_when_shorter() {
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap();
        c.h(QubitId(0)).unwrap().s(QubitId(0)).unwrap();
        let before = single_qubit_unitary(&c);

        let out = merge(&c, ProviderConstraints::generic());
        assert_eq!(out.gate_count(), 1);
        assert!(single_qubit_unitary(&out).equivalent(&before));

        let out = merge(&c, ProviderConstraints::ionq());
        assert!(out.gate_count() <= 3);
        assert!(single_qubit_unitary(&out).equivalent(&before));
    }

    #[test]
    fn test_longer_synthesis_is_rejected() {
        // H·T on IBM needs rz, sx, rz: three gates for a run of two.
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.h(QubitId(0)).unwrap().t(QubitId(0)).unwrap();
        assert_eq!(merge(&c, ProviderConstraints::ibm_quantum()), c);
    }

    #[test]
    fn test_runs_stop_at_multi_qubit_gates() {
        let mut c = Circuit::with_size("t", 2, 0).unwrap();
        c.rz(0.1, QubitId(0)).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.rz(0.2, QubitId(0)).unwrap();
        assert_eq!(merge(&c, ProviderConstraints::generic()), c);
    }
}
