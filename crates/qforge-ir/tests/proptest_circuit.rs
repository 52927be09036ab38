//! Property tests for circuit invariants.

use proptest::prelude::*;
use qforge_ir::{Circuit, Instruction, QubitId, StandardGate};

const NUM_QUBITS: u32 = 4;

fn arb_gate() -> impl Strategy<Value = (StandardGate, Vec<u32>)> {
    let one_qubit = (
        prop_oneof![
            Just(StandardGate::H),
            Just(StandardGate::X),
            Just(StandardGate::T),
            (-3.0f64..3.0).prop_map(StandardGate::Rz),
            (-3.0f64..3.0).prop_map(StandardGate::Ry),
        ],
        0..NUM_QUBITS,
    )
        .prop_map(|(g, q)| (g, vec![q]));
    let two_qubit = (
        prop_oneof![Just(StandardGate::CX), Just(StandardGate::CZ)],
        0..NUM_QUBITS,
        1..NUM_QUBITS,
    )
        .prop_map(|(g, a, off)| (g, vec![a, (a + off) % NUM_QUBITS]));
    prop_oneof![3 => one_qubit, 1 => two_qubit]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    prop::collection::vec(arb_gate(), 0..40).prop_map(|gates| {
        let mut circuit = Circuit::with_size("random", NUM_QUBITS, 0).unwrap();
        for (gate, qubits) in gates {
            circuit
                .push(Instruction::gate(gate, qubits.into_iter().map(QubitId)).unwrap())
                .unwrap();
        }
        circuit
    })
}

proptest! {
    #[test]
    fn dag_round_trip_preserves_circuit(circuit in arb_circuit()) {
        let dag = circuit.to_dag().unwrap();
        prop_assert_eq!(dag.num_ops(), circuit.instructions().len());
        let back = Circuit::from_dag("random", &dag).unwrap();
        prop_assert_eq!(back, circuit);
    }

    #[test]
    fn depth_never_exceeds_gate_count(circuit in arb_circuit()) {
        prop_assert!(circuit.depth() <= circuit.gate_count());
    }

    #[test]
    fn appending_a_gate_never_reduces_depth(circuit in arb_circuit(), (gate, qubits) in arb_gate()) {
        let before = circuit.depth();
        let mut longer = circuit.clone();
        longer.gate(gate, qubits.into_iter().map(QubitId)).unwrap();
        prop_assert!(longer.depth() >= before);
        prop_assert!(longer.depth() <= before + 1);
    }
}
