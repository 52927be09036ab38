//! Grover search over `2^n` basis states.

use std::f64::consts::PI;

use qforge_ir::{Circuit, IrResult, QubitId};

use super::{bit, pow2};

/// Iterations that maximise the success probability for one marked state.
pub fn optimal_iterations(num_qubits: u32) -> u32 {
    let n = pow2(num_qubits as usize);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let optimal = (PI / 4.0 * n.sqrt()).floor() as u32;
    optimal.max(1)
}

/// Grover search for `marked`, whose bit `i` is qubit `i`.
///
/// `iterations` defaults to [`optimal_iterations`]. All qubits are measured.
pub fn grover(num_qubits: u32, marked: u64, iterations: Option<u32>) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("grover", num_qubits, 0)?;
    let qubits: Vec<QubitId> = circuit.qubits().collect();
    for q in &qubits {
        circuit.h(*q)?;
    }

    for _ in 0..iterations.unwrap_or_else(|| optimal_iterations(num_qubits)) {
        // Oracle: phase flip on |marked⟩.
        let zeros: Vec<QubitId> = qubits
            .iter()
            .copied()
            .filter(|q| !bit(marked, q.0))
            .collect();
        for q in &zeros {
            circuit.x(*q)?;
        }
        multi_controlled_z(&mut circuit, &qubits)?;
        for q in &zeros {
            circuit.x(*q)?;
        }

        // Diffusion: reflection about the uniform superposition.
        for q in &qubits {
            circuit.h(*q)?;
            circuit.x(*q)?;
        }
        multi_controlled_z(&mut circuit, &qubits)?;
        for q in &qubits {
            circuit.x(*q)?;
            circuit.h(*q)?;
        }
    }

    circuit.measure_all()?;
    Ok(circuit)
}

/// Phase flip on the all-ones state of `qubits`.
fn multi_controlled_z(circuit: &mut Circuit, qubits: &[QubitId]) -> IrResult<()> {
    match qubits {
        [] => Ok(()),
        [q] => circuit.z(*q).map(|_| ()),
        [a, b] => circuit.cz(*a, *b).map(|_| ()),
        [controls @ .., target] => multi_controlled_phase(circuit, PI, controls, *target),
    }
}

/// `P(lambda)` on `target` conditioned on every control being |1⟩.
///
/// Recurses on the last control: a controlled square root, two
/// multi-controlled X gates on that control, and the remaining controls
/// driving the other square root. No ancillas are used.
fn multi_controlled_phase(
    circuit: &mut Circuit,
    lambda: f64,
    controls: &[QubitId],
    target: QubitId,
) -> IrResult<()> {
    match controls {
        [] => circuit.u1(lambda, target).map(|_| ()),
        [c] => circuit.cp(lambda, *c, target).map(|_| ()),
        [rest @ .., last] => {
            circuit.cp(lambda / 2.0, *last, target)?;
            multi_controlled_x(circuit, rest, *last)?;
            circuit.cp(-lambda / 2.0, *last, target)?;
            multi_controlled_x(circuit, rest, *last)?;
            multi_controlled_phase(circuit, lambda / 2.0, rest, target)
        }
    }
}

fn multi_controlled_x(
    circuit: &mut Circuit,
    controls: &[QubitId],
    target: QubitId,
) -> IrResult<()> {
    match controls {
        [] => circuit.x(target).map(|_| ()),
        [c] => circuit.cx(*c, target).map(|_| ()),
        [a, b] => circuit.ccx(*a, *b, target).map(|_| ()),
        _ => {
            circuit.h(target)?;
            multi_controlled_phase(circuit, PI, controls, target)?;
            circuit.h(target).map(|_| ())
        }
    }
}
