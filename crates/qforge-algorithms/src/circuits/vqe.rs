//! Hardware-efficient VQE ansatz.
//!
//! Each layer applies RY and RZ rotations to every qubit followed by a CX
//! entangling pattern; a final RY layer closes the circuit. Initial angles
//! come from an injected random generator so callers control the seed.

use std::f64::consts::PI;
use std::str::FromStr;

use qforge_ir::{Circuit, IrError, IrResult, QubitId};
use rand::Rng;

/// Which qubit pairs the entangling layer connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entanglement {
    /// Nearest neighbours, `(i, i+1)`.
    Linear,
    /// Linear plus the closing pair `(n-1, 0)`.
    Circular,
    /// Every pair `(i, j)` with `i < j`.
    Full,
}

impl Entanglement {
    pub const NAMES: [&'static str; 3] = ["linear", "circular", "full"];

    /// Control/target pairs for `n` qubits.
    pub fn pairs(self, n: u32) -> Vec<(u32, u32)> {
        let mut pairs: Vec<(u32, u32)> = match self {
            Entanglement::Linear | Entanglement::Circular => {
                (1..n).map(|q| (q - 1, q)).collect()
            }
            Entanglement::Full => (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
                .collect(),
        };
        if self == Entanglement::Circular && n > 2 {
            pairs.push((n - 1, 0));
        }
        pairs
    }
}

impl FromStr for Entanglement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Entanglement::Linear),
            "circular" => Ok(Entanglement::Circular),
            "full" => Ok(Entanglement::Full),
            other => Err(format!("unknown entanglement pattern '{other}'")),
        }
    }
}

/// Number of rotation angles the ansatz consumes.
pub fn num_parameters(num_qubits: u32, layers: u32) -> usize {
    let n = num_qubits as usize;
    2 * n * layers as usize + n
}

/// Build the ansatz from explicit angles, consumed in gate order.
pub fn hardware_efficient_ansatz(
    num_qubits: u32,
    layers: u32,
    entanglement: Entanglement,
    angles: &[f64],
    measure: bool,
) -> IrResult<Circuit> {
    let expected = num_parameters(num_qubits, layers);
    if angles.len() != expected {
        return Err(IrError::ParameterCountMismatch {
            gate_name: "vqe_standard".into(),
            expected,
            got: angles.len(),
        });
    }

    let mut circuit = Circuit::with_size("vqe_standard", num_qubits, 0)?;
    let mut angles = angles.iter().copied();
    let mut next = move || angles.next().unwrap_or_default();
    let pairs = entanglement.pairs(num_qubits);

    for _ in 0..layers {
        for q in 0..num_qubits {
            circuit.ry(next(), QubitId(q))?;
            circuit.rz(next(), QubitId(q))?;
        }
        for (control, target) in &pairs {
            circuit.cx(QubitId(*control), QubitId(*target))?;
        }
    }
    for q in 0..num_qubits {
        circuit.ry(next(), QubitId(q))?;
    }

    if measure {
        circuit.measure_all()?;
    }
    Ok(circuit)
}

/// Build the ansatz with angles drawn uniformly from `[-π, π)`.
pub fn vqe_ansatz<R: Rng + ?Sized>(
    num_qubits: u32,
    layers: u32,
    entanglement: Entanglement,
    measure: bool,
    rng: &mut R,
) -> IrResult<Circuit> {
    let angles: Vec<f64> = (0..num_parameters(num_qubits, layers))
        .map(|_| rng.gen_range(-PI..PI))
        .collect();
    hardware_efficient_ansatz(num_qubits, layers, entanglement, &angles, measure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_entanglement_pairs() {
        assert_eq!(Entanglement::Linear.pairs(3), vec![(0, 1), (1, 2)]);
        assert_eq!(Entanglement::Circular.pairs(3), vec![(0, 1), (1, 2), (2, 0)]);
        assert_eq!(Entanglement::Circular.pairs(2), vec![(0, 1)]);
        assert_eq!(Entanglement::Full.pairs(4).len(), 6);
    }

    #[test]
    fn test_gate_counts() {
        let mut rng = SmallRng::seed_from_u64(7);
        let c = vqe_ansatz(4, 2, Entanglement::Linear, false, &mut rng).unwrap();
        assert_eq!(c.gate_count(), num_parameters(4, 2) + 2 * 3);
        assert_eq!(c.two_qubit_gate_count(), 6);
    }

    #[test]
    fn test_same_seed_same_circuit() {
        let build = |seed| {
            vqe_ansatz(3, 2, Entanglement::Full, true, &mut SmallRng::seed_from_u64(seed)).unwrap()
        };
        let (a, b, c) = (build(42), build(42), build(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_angle_count_checked() {
        let err =
            hardware_efficient_ansatz(2, 1, Entanglement::Linear, &[0.1; 3], false).unwrap_err();
        assert!(matches!(err, IrError::ParameterCountMismatch { expected: 6, got: 3, .. }));
    }
}
