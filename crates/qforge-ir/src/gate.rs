//! Quantum gate vocabulary.
//!
//! Every gate is a variant of [`StandardGate`] carrying its angles, so the
//! parameter arity of a gate is fixed by its type. Qubit arity is checked
//! when the gate is placed into an [`Instruction`](crate::Instruction).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, TAU};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Tolerance used when comparing angles.
pub const ANGLE_TOLERANCE: f64 = 1e-9;

/// Row-major 2x2 complex matrix.
pub type Matrix2 = [[Complex64; 2]; 2];

/// Canonical names of every gate in the vocabulary.
pub const GATE_NAMES: &[&str] = &[
    "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "sxdg", "rx", "ry", "rz", "u1", "u2",
    "u3", "cx", "cy", "cz", "ch", "swap", "crz", "cp", "rzz", "ccx", "cswap",
];

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate diag(1, e^{iλ}).
    U1(f64),
    /// U2(φ, λ) = U3(π/2, φ, λ).
    U2(f64, f64),
    /// Universal single-qubit gate U3(θ, φ, λ).
    U3(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Build a gate from its QASM name and evaluated parameters.
    ///
    /// Accepts the `qelib1.inc` aliases `u`, `U`, `p`, `cu1`, `CX` and `cnot`.
    pub fn from_name(name: &str, params: &[f64]) -> IrResult<Self> {
        let canonical = canonical_name(name).ok_or_else(|| IrError::UnknownGate(name.into()))?;
        let expected = params_for(canonical);
        if params.len() != expected {
            return Err(IrError::ParameterCountMismatch {
                gate_name: canonical.to_string(),
                expected,
                got: params.len(),
            });
        }
        let p = |i: usize| params[i];
        let gate = match canonical {
            "id" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "sx" => StandardGate::SX,
            "sxdg" => StandardGate::SXdg,
            "rx" => StandardGate::Rx(p(0)),
            "ry" => StandardGate::Ry(p(0)),
            "rz" => StandardGate::Rz(p(0)),
            "u1" => StandardGate::U1(p(0)),
            "u2" => StandardGate::U2(p(0), p(1)),
            "u3" => StandardGate::U3(p(0), p(1), p(2)),
            "cx" => StandardGate::CX,
            "cy" => StandardGate::CY,
            "cz" => StandardGate::CZ,
            "ch" => StandardGate::CH,
            "swap" => StandardGate::Swap,
            "crz" => StandardGate::CRz(p(0)),
            "cp" => StandardGate::CP(p(0)),
            "rzz" => StandardGate::RZZ(p(0)),
            "ccx" => StandardGate::CCX,
            "cswap" => StandardGate::CSwap,
            other => return Err(IrError::UnknownGate(other.into())),
        };
        Ok(gate)
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::U1(_) => "u1",
            StandardGate::U2(_, _) => "u2",
            StandardGate::U3(_, _, _) => "u3",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::U1(_)
            | StandardGate::U2(_, _)
            | StandardGate::U3(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get the parameters of this gate in QASM order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::U1(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RZZ(p) => vec![p],
            StandardGate::U2(phi, lambda) => vec![phi, lambda],
            StandardGate::U3(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => vec![],
        }
    }

    /// Number of angle parameters.
    #[inline]
    pub fn num_params(&self) -> usize {
        params_for(self.name())
    }

    /// True when applying the gate twice is the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CY
                | StandardGate::CZ
                | StandardGate::CH
                | StandardGate::Swap
                | StandardGate::CCX
                | StandardGate::CSwap
        )
    }

    /// True when the gate is invariant under permutation of its qubits.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            StandardGate::CZ | StandardGate::Swap | StandardGate::CP(_) | StandardGate::RZZ(_)
        )
    }

    /// True when the gate acts as the identity (up to a global phase).
    pub fn is_identity(&self) -> bool {
        match *self {
            StandardGate::I => true,
            StandardGate::Rx(a)
            | StandardGate::Ry(a)
            | StandardGate::Rz(a)
            | StandardGate::U1(a)
            | StandardGate::CP(a)
            | StandardGate::RZZ(a) => angle_is_zero(a, TAU),
            StandardGate::CRz(a) => angle_is_zero(a, 2.0 * TAU),
            StandardGate::U3(theta, phi, lambda) => {
                angle_is_zero(theta, TAU) && angle_is_zero(phi + lambda, TAU)
            }
            _ => false,
        }
    }

    /// The inverse gate.
    pub fn inverse(&self) -> StandardGate {
        match *self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,
            StandardGate::Rx(a) => StandardGate::Rx(-a),
            StandardGate::Ry(a) => StandardGate::Ry(-a),
            StandardGate::Rz(a) => StandardGate::Rz(-a),
            StandardGate::U1(a) => StandardGate::U1(-a),
            StandardGate::U2(phi, lambda) => StandardGate::U3(-FRAC_PI_2, -lambda, -phi),
            StandardGate::U3(theta, phi, lambda) => StandardGate::U3(-theta, -lambda, -phi),
            StandardGate::CRz(a) => StandardGate::CRz(-a),
            StandardGate::CP(a) => StandardGate::CP(-a),
            StandardGate::RZZ(a) => StandardGate::RZZ(-a),
            other => other,
        }
    }

    /// True when `self` followed by `other` on the same qubits is the identity.
    pub fn cancels_with(&self, other: &StandardGate) -> bool {
        match (*self, *other) {
            (StandardGate::S, StandardGate::Sdg)
            | (StandardGate::Sdg, StandardGate::S)
            | (StandardGate::T, StandardGate::Tdg)
            | (StandardGate::Tdg, StandardGate::T)
            | (StandardGate::SX, StandardGate::SXdg)
            | (StandardGate::SXdg, StandardGate::SX) => true,

            (StandardGate::Rx(a), StandardGate::Rx(b))
            | (StandardGate::Ry(a), StandardGate::Ry(b))
            | (StandardGate::Rz(a), StandardGate::Rz(b))
            | (StandardGate::U1(a), StandardGate::U1(b))
            | (StandardGate::CP(a), StandardGate::CP(b))
            | (StandardGate::RZZ(a), StandardGate::RZZ(b)) => angle_is_zero(a + b, TAU),

            // CRz(2π) is a Z on the control, so the period doubles.
            (StandardGate::CRz(a), StandardGate::CRz(b)) => angle_is_zero(a + b, 2.0 * TAU),

            (a, b) => a == b && a.is_self_inverse(),
        }
    }

    /// The 2x2 unitary of a single-qubit gate, `None` for multi-qubit gates.
    pub fn matrix(&self) -> Option<Matrix2> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let phase = |angle: f64| Complex64::from_polar(1.0, angle);

        let m = match *self {
            StandardGate::I => [[one, zero], [zero, one]],
            StandardGate::X => [[zero, one], [one, zero]],
            StandardGate::Y => [[zero, -i], [i, zero]],
            StandardGate::Z => [[one, zero], [zero, -one]],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            StandardGate::S => [[one, zero], [zero, i]],
            StandardGate::Sdg => [[one, zero], [zero, -i]],
            StandardGate::T => [[one, zero], [zero, phase(TAU / 8.0)]],
            StandardGate::Tdg => [[one, zero], [zero, phase(-TAU / 8.0)]],
            StandardGate::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                [[a, b], [b, a]]
            }
            StandardGate::SXdg => {
                let a = Complex64::new(0.5, -0.5);
                let b = Complex64::new(0.5, 0.5);
                [[a, b], [b, a]]
            }
            StandardGate::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                [[c, s], [s, c]]
            }
            StandardGate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                [[c, -s], [s, c]]
            }
            StandardGate::Rz(theta) => [[phase(-theta / 2.0), zero], [zero, phase(theta / 2.0)]],
            StandardGate::U1(lambda) => [[one, zero], [zero, phase(lambda)]],
            StandardGate::U2(phi, lambda) => u3_matrix(FRAC_PI_2, phi, lambda),
            StandardGate::U3(theta, phi, lambda) => u3_matrix(theta, phi, lambda),
            _ => return None,
        };
        Some(m)
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params();
        if params.is_empty() {
            return f.write_str(self.name());
        }
        let rendered: Vec<String> = params.iter().map(|p| format!("{p:.4}")).collect();
        write!(f, "{}({})", self.name(), rendered.join(", "))
    }
}

/// Map a QASM gate name or alias onto the canonical vocabulary name.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let canonical = match name {
        "u" | "U" | "u3" => "u3",
        "p" | "u1" | "phase" => "u1",
        "cu1" | "cp" | "cphase" => "cp",
        "CX" | "cx" | "cnot" => "cx",
        "i" | "id" => "id",
        other => GATE_NAMES.iter().copied().find(|n| *n == other)?,
    };
    Some(canonical)
}

/// True when `angle` is a multiple of `period` within [`ANGLE_TOLERANCE`].
pub fn angle_is_zero(angle: f64, period: f64) -> bool {
    let r = angle.rem_euclid(period);
    r < ANGLE_TOLERANCE || period - r < ANGLE_TOLERANCE
}

fn params_for(canonical: &str) -> usize {
    match canonical {
        "rx" | "ry" | "rz" | "u1" | "crz" | "cp" | "rzz" => 1,
        "u2" => 2,
        "u3" => 3,
        _ => 0,
    }
}

fn u3_matrix(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
        ],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn mul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
        let mut out = [[Complex64::new(0.0, 0.0); 2]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        out
    }

    fn is_identity_up_to_phase(m: &Matrix2) -> bool {
        m[0][1].norm() < 1e-9
            && m[1][0].norm() < 1e-9
            && (m[0][0] - m[1][1]).norm() < 1e-9
            && (m[0][0].norm() - 1.0).abs() < 1e-9
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::U3(0.1, 0.2, 0.3).num_params(), 3);
        assert_eq!(StandardGate::Rx(PI).params(), vec![PI]);
    }

    #[test]
    fn test_from_name_checks_parameter_arity() {
        assert_eq!(StandardGate::from_name("rx", &[0.5]).unwrap(), StandardGate::Rx(0.5));
        assert!(matches!(
            StandardGate::from_name("rx", &[]),
            Err(IrError::ParameterCountMismatch { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            StandardGate::from_name("h", &[1.0]),
            Err(IrError::ParameterCountMismatch { expected: 0, got: 1, .. })
        ));
        assert!(matches!(
            StandardGate::from_name("frobnicate", &[]),
            Err(IrError::UnknownGate(_))
        ));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(StandardGate::from_name("CX", &[]).unwrap(), StandardGate::CX);
        assert_eq!(StandardGate::from_name("p", &[0.3]).unwrap(), StandardGate::U1(0.3));
        assert_eq!(
            StandardGate::from_name("U", &[0.1, 0.2, 0.3]).unwrap(),
            StandardGate::U3(0.1, 0.2, 0.3)
        );
        assert_eq!(StandardGate::from_name("cu1", &[0.3]).unwrap(), StandardGate::CP(0.3));
    }

    #[test]
    fn test_names_round_trip() {
        for name in GATE_NAMES {
            let params = vec![0.25; params_for(name)];
            let gate = StandardGate::from_name(name, &params).unwrap();
            assert_eq!(gate.name(), *name);
        }
    }

    #[test]
    fn test_cancellation_pairs() {
        assert!(StandardGate::X.cancels_with(&StandardGate::X));
        assert!(StandardGate::S.cancels_with(&StandardGate::Sdg));
        assert!(!StandardGate::S.cancels_with(&StandardGate::S));
        assert!(StandardGate::Rz(0.4).cancels_with(&StandardGate::Rz(-0.4)));
        assert!(StandardGate::Rz(PI).cancels_with(&StandardGate::Rz(PI)));
        assert!(!StandardGate::Rz(0.4).cancels_with(&StandardGate::Rx(-0.4)));
        assert!(!StandardGate::CRz(PI).cancels_with(&StandardGate::CRz(PI)));
        assert!(StandardGate::CRz(TAU).cancels_with(&StandardGate::CRz(TAU)));
    }

    #[test]
    fn test_matrix_inverse_products() {
        let gates = [
            StandardGate::H,
            StandardGate::S,
            StandardGate::T,
            StandardGate::SX,
            StandardGate::Rx(0.7),
            StandardGate::Ry(-1.3),
            StandardGate::Rz(2.1),
            StandardGate::U1(0.4),
            StandardGate::U2(0.3, -0.8),
            StandardGate::U3(1.1, 0.2, -2.5),
        ];
        for gate in gates {
            let m = gate.matrix().unwrap();
            let inv = gate.inverse().matrix().unwrap();
            assert!(is_identity_up_to_phase(&mul(&inv, &m)), "{gate}");
        }
    }

    #[test]
    fn test_multi_qubit_gates_have_no_matrix() {
        assert!(StandardGate::CX.matrix().is_none());
        assert!(StandardGate::CCX.matrix().is_none());
    }

    #[test]
    fn test_identity_detection() {
        assert!(StandardGate::Rz(TAU).is_identity());
        assert!(StandardGate::Rx(0.0).is_identity());
        assert!(!StandardGate::Rx(PI).is_identity());
        assert!(!StandardGate::CRz(TAU).is_identity());
    }

    #[test]
    fn test_display() {
        assert_eq!(StandardGate::H.to_string(), "h");
        assert_eq!(StandardGate::Rz(0.5).to_string(), "rz(0.5000)");
    }
}
