//! 2x2 unitaries for single-qubit gate merging and synthesis.

use num_complex::Complex64;
use qforge_ir::{Matrix2, StandardGate};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Tolerance for matrix comparisons.
const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements `[a, b, c, d]` of `[[a, b], [c, d]]`.
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    pub fn identity() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self::new(one, zero, zero, one)
    }

    /// The unitary of a single-qubit gate.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        gate.matrix().map(Self::from)
    }

    /// Matrix product `self * other`, i.e. `other` applied first.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// True when the matrix is a multiple of the identity.
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        b.norm() < EPSILON && c.norm() < EPSILON && (a - d).norm() < EPSILON
    }

    /// True when `self` and `other` differ only by a global phase.
    pub fn equivalent(&self, other: &Self) -> bool {
        let Some(k) = (0..4).max_by(|i, j| other.data[*i].norm().total_cmp(&other.data[*j].norm()))
        else {
            return false;
        };
        let phase = self.data[k] / other.data[k];
        (phase.norm() - 1.0).abs() < 1e-8
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(x, y)| (x - phase * y).norm() < 1e-8)
    }

    /// Euler angles `(θ, φ, λ)` with `self = e^{iγ} · U3(θ, φ, λ)`.
    ///
    /// Equivalently `self ∝ Rz(φ) · Ry(θ) · Rz(λ)`.
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        let [a, b, c, d] = self.data;
        let det = a * d - b * c;
        let unphase = Complex64::from_polar(1.0, -det.arg() / 2.0);
        let a = a * unphase;
        let c = c * unphase;

        let theta = 2.0 * c.norm().atan2(a.norm());
        let (sum, diff) = if a.norm() < EPSILON {
            (0.0, 2.0 * c.arg())
        } else if c.norm() < EPSILON {
            (-2.0 * a.arg(), 0.0)
        } else {
            (-2.0 * a.arg(), 2.0 * c.arg())
        };
        (theta, (sum + diff) / 2.0, (sum - diff) / 2.0)
    }
}

impl From<Matrix2> for Unitary2x2 {
    fn from(m: Matrix2) -> Self {
        Self::new(m[0][0], m[0][1], m[1][0], m[1][1])
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

/// Map an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

/// Single-qubit basis a provider can express every unitary in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneQubitBasis {
    /// Native `u3`.
    U3,
    /// `rz · ry · rz`.
    Zyz,
    /// `rz · sx · rz · sx · rz`.
    Zsx,
    /// `rz · rx · rz`.
    Zxz,
}

impl OneQubitBasis {
    /// Gates in time order implementing `U3(θ, φ, λ)` up to global phase.
    ///
    /// Zero rotations are omitted, so the identity synthesises to nothing.
    pub fn synthesize(self, theta: f64, phi: f64, lambda: f64) -> Vec<StandardGate> {
        let theta = normalize_angle(theta);
        if is_zero(theta) {
            let total = normalize_angle(phi + lambda);
            return match self {
                _ if is_zero(total) => vec![],
                OneQubitBasis::U3 => vec![StandardGate::U3(0.0, total, 0.0)],
                _ => vec![StandardGate::Rz(total)],
            };
        }
        let gates = match self {
            OneQubitBasis::U3 => {
                return vec![StandardGate::U3(
                    theta,
                    normalize_angle(phi),
                    normalize_angle(lambda),
                )];
            }
            OneQubitBasis::Zyz => vec![
                StandardGate::Rz(lambda),
                StandardGate::Ry(theta),
                StandardGate::Rz(phi),
            ],
            OneQubitBasis::Zxz => vec![
                StandardGate::Rz(lambda - FRAC_PI_2),
                StandardGate::Rx(theta),
                StandardGate::Rz(phi + FRAC_PI_2),
            ],
            OneQubitBasis::Zsx if (theta - FRAC_PI_2).abs() < EPSILON => vec![
                StandardGate::Rz(lambda - FRAC_PI_2),
                StandardGate::SX,
                StandardGate::Rz(phi + FRAC_PI_2),
            ],
            OneQubitBasis::Zsx => vec![
                StandardGate::Rz(lambda),
                StandardGate::SX,
                StandardGate::Rz(theta + PI),
                StandardGate::SX,
                StandardGate::Rz(phi + PI),
            ],
        };
        gates
            .into_iter()
            .filter_map(|g| match g {
                StandardGate::Rz(a) if is_zero(normalize_angle(a)) => None,
                StandardGate::Rz(a) => Some(StandardGate::Rz(normalize_angle(a))),
                other => Some(other),
            })
            .collect()
    }

    /// Synthesize an arbitrary unitary.
    pub fn synthesize_unitary(self, u: &Unitary2x2) -> Vec<StandardGate> {
        let (theta, phi, lambda) = u.euler_angles();
        self.synthesize(theta, phi, lambda)
    }
}

fn is_zero(angle: f64) -> bool {
    angle.abs() < EPSILON
}

/// Product of a time-ordered gate list.
pub fn product(gates: &[StandardGate]) -> Option<Unitary2x2> {
    gates.iter().try_fold(Unitary2x2::identity(), |acc, g| {
        Unitary2x2::from_gate(g).map(|m| m * acc)
    })
}
