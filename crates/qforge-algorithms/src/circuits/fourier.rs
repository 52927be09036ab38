//! Quantum Fourier transform and phase estimation.
//!
//! Registers are little-endian: qubit `i` holds bit `i` of the register
//! value, so `QFT|x⟩ = Σ_y e^{2πi·xy/N}|y⟩/√N`.

use std::f64::consts::PI;

use qforge_ir::{Circuit, ClbitId, IrResult, QubitId};

use super::pow2;

/// Append the QFT on `qubits` (least significant first).
pub fn append_qft(
    circuit: &mut Circuit,
    qubits: &[QubitId],
    inverse: bool,
    swaps: bool,
) -> IrResult<()> {
    let n = qubits.len();
    // (angle, control, target); no control means a Hadamard on target.
    let mut ops: Vec<(f64, Option<QubitId>, QubitId)> = Vec::new();
    for j in (0..n).rev() {
        ops.push((0.0, None, qubits[j]));
        for k in (0..j).rev() {
            let angle = PI / pow2(j - k);
            ops.push((angle, Some(qubits[k]), qubits[j]));
        }
    }

    let apply = |circuit: &mut Circuit, (angle, control, target): (f64, Option<QubitId>, QubitId)| {
        let angle = if inverse { -angle } else { angle };
        match control {
            Some(control) => circuit.cp(angle, control, target).map(|_| ()),
            None => circuit.h(target).map(|_| ()),
        }
    };
    let swap_pairs: Vec<(QubitId, QubitId)> = if swaps {
        (0..n / 2).map(|i| (qubits[i], qubits[n - 1 - i])).collect()
    } else {
        Vec::new()
    };

    if inverse {
        for (a, b) in &swap_pairs {
            circuit.swap(*a, *b)?;
        }
        for op in ops.into_iter().rev() {
            apply(circuit, op)?;
        }
    } else {
        for op in ops {
            apply(circuit, op)?;
        }
        for (a, b) in &swap_pairs {
            circuit.swap(*a, *b)?;
        }
    }
    Ok(())
}

/// QFT on a fresh register.
pub fn qft(num_qubits: u32, inverse: bool, swaps: bool, measure: bool) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("qft", num_qubits, 0)?;
    let qubits: Vec<QubitId> = circuit.qubits().collect();
    append_qft(&mut circuit, &qubits, inverse, swaps)?;
    if measure {
        circuit.measure_all()?;
    }
    Ok(circuit)
}

/// Estimate the eigenphase of `P(2π·phase)` on its |1⟩ eigenstate.
///
/// Qubits `0..precision` form the counting register, qubit `precision`
/// holds the eigenstate. The counting register is measured into clbits
/// `0..precision` and reads `phase·2^precision` when that is an integer.
pub fn qpe(precision: u32, phase: f64) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("qpe", precision.saturating_add(1), precision)?;
    let target = QubitId(precision);
    let counting: Vec<QubitId> = (0..precision).map(QubitId).collect();

    circuit.x(target)?;
    for q in &counting {
        circuit.h(*q)?;
    }
    for (k, q) in counting.iter().enumerate() {
        let power = pow2(k);
        circuit.cp(2.0 * PI * phase * power, *q, target)?;
    }
    append_qft(&mut circuit, &counting, true, true)?;
    for (k, q) in counting.iter().enumerate() {
        circuit.measure(*q, ClbitId(k as u32))?;
    }
    Ok(circuit)
}
