//! Error-mitigation strategy selection.
//!
//! Each strategy carries a list of [`Condition`]s over circuit metrics and
//! the provider profile. A strategy is recommended only when every one of
//! its conditions holds.

use qforge_ir::Circuit;
use qforge_target::{NoiseLevel, ProviderConstraints};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fidelity::{FidelityEstimate, estimate};

/// Circuit figures the conditions are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationMetrics {
    pub num_qubits: u32,
    pub gate_count: usize,
    pub depth: usize,
    pub two_qubit_gates: usize,
    pub measurements: usize,
}

impl MitigationMetrics {
    /// Collect metrics from a circuit.
    pub fn of(circuit: &Circuit) -> Self {
        Self {
            num_qubits: circuit.num_qubits(),
            gate_count: circuit.gate_count(),
            depth: circuit.depth(),
            two_qubit_gates: circuit.two_qubit_gate_count(),
            measurements: circuit.measurements().map(|m| m.qubits.len()).sum(),
        }
    }
}

/// A predicate a strategy requires before it is worth applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "condition", content = "value")]
pub enum Condition {
    /// At least this many gates.
    MinGateCount(usize),
    /// At least this depth.
    MinDepth(usize),
    /// At least this many multi-qubit gates.
    MinTwoQubitGates(usize),
    /// The circuit measures something.
    HasMeasurements,
    /// At most this many qubits.
    MaxQubits(u32),
    /// At most this many gates.
    MaxGateCount(usize),
    /// The provider is at least this noisy.
    NoiseAtLeast(NoiseLevel),
}

impl Condition {
    /// Evaluate the condition.
    pub fn holds(&self, metrics: &MitigationMetrics, provider: &ProviderConstraints) -> bool {
        match *self {
            Condition::MinGateCount(n) => metrics.gate_count >= n,
            Condition::MinDepth(n) => metrics.depth >= n,
            Condition::MinTwoQubitGates(n) => metrics.two_qubit_gates >= n,
            Condition::HasMeasurements => metrics.measurements > 0,
            Condition::MaxQubits(n) => metrics.num_qubits <= n,
            Condition::MaxGateCount(n) => metrics.gate_count <= n,
            Condition::NoiseAtLeast(level) => provider.noise_level >= level,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::MinGateCount(n) => write!(f, "gate count >= {n}"),
            Condition::MinDepth(n) => write!(f, "depth >= {n}"),
            Condition::MinTwoQubitGates(n) => write!(f, "two-qubit gates >= {n}"),
            Condition::HasMeasurements => f.write_str("circuit has measurements"),
            Condition::MaxQubits(n) => write!(f, "qubits <= {n}"),
            Condition::MaxGateCount(n) => write!(f, "gate count <= {n}"),
            Condition::NoiseAtLeast(level) => write!(f, "provider noise >= {level}"),
        }
    }
}

/// Known mitigation techniques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    ReadoutErrorMitigation,
    ZeroNoiseExtrapolation,
    DynamicalDecoupling,
    PauliTwirling,
    ProbabilisticErrorCancellation,
    SymmetryVerification,
}

impl Technique {
    /// All techniques in catalogue order.
    pub const ALL: [Technique; 6] = [
        Technique::ReadoutErrorMitigation,
        Technique::ZeroNoiseExtrapolation,
        Technique::DynamicalDecoupling,
        Technique::PauliTwirling,
        Technique::ProbabilisticErrorCancellation,
        Technique::SymmetryVerification,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Technique::ReadoutErrorMitigation => "Readout Error Mitigation",
            Technique::ZeroNoiseExtrapolation => "Zero-Noise Extrapolation",
            Technique::DynamicalDecoupling => "Dynamical Decoupling",
            Technique::PauliTwirling => "Pauli Twirling",
            Technique::ProbabilisticErrorCancellation => "Probabilistic Error Cancellation",
            Technique::SymmetryVerification => "Symmetry Verification",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Technique::ReadoutErrorMitigation => {
                "Calibrate the measurement confusion matrix and invert it on the counts"
            }
            Technique::ZeroNoiseExtrapolation => {
                "Run at amplified noise levels and extrapolate the result to zero noise"
            }
            Technique::DynamicalDecoupling => {
                "Insert refocusing pulse sequences on idle qubits to suppress dephasing"
            }
            Technique::PauliTwirling => {
                "Randomise two-qubit gates with Pauli frames to turn coherent errors stochastic"
            }
            Technique::ProbabilisticErrorCancellation => {
                "Sample from a quasi-probability decomposition of the inverse noise channel"
            }
            Technique::SymmetryVerification => {
                "Discard shots that violate a conserved symmetry of the circuit"
            }
        }
    }

    /// Conditions under which the technique pays off.
    pub fn conditions(self) -> Vec<Condition> {
        match self {
            Technique::ReadoutErrorMitigation => vec![Condition::HasMeasurements],
            // ZNE needs enough gates for noise amplification to be meaningful.
            Technique::ZeroNoiseExtrapolation => vec![Condition::MinGateCount(51)],
            Technique::DynamicalDecoupling => vec![
                Condition::MinDepth(10),
                Condition::NoiseAtLeast(NoiseLevel::Medium),
            ],
            Technique::PauliTwirling => vec![Condition::MinTwoQubitGates(5)],
            // Sampling overhead grows exponentially with circuit size.
            Technique::ProbabilisticErrorCancellation => vec![
                Condition::MinGateCount(1),
                Condition::MaxQubits(10),
                Condition::MaxGateCount(100),
            ],
            Technique::SymmetryVerification => vec![
                Condition::HasMeasurements,
                Condition::MinTwoQubitGates(1),
            ],
        }
    }

    /// Multiplier on the number of shots needed for the same precision.
    fn shot_overhead(self, estimate: &FidelityEstimate) -> f64 {
        match self {
            Technique::ReadoutErrorMitigation => 2.0,
            Technique::ZeroNoiseExtrapolation => 3.0,
            Technique::DynamicalDecoupling => 1.0,
            Technique::PauliTwirling => 1.5,
            Technique::ProbabilisticErrorCancellation => {
                // γ² with γ ≈ 1 + 2ε per unit of gate error.
                let gamma = 1.0 + 2.0 * estimate.gate_error;
                gamma * gamma
            }
            Technique::SymmetryVerification => 1.0 / estimate.overall_fidelity.max(0.01),
        }
    }

    /// Remaining fraction of each error term: (gate, decoherence, crosstalk, readout).
    fn residual_errors(self) -> (f64, f64, f64, f64) {
        match self {
            Technique::ReadoutErrorMitigation => (1.0, 1.0, 1.0, 0.2),
            Technique::ZeroNoiseExtrapolation => (0.5, 0.7, 0.7, 1.0),
            Technique::DynamicalDecoupling => (1.0, 0.5, 0.9, 1.0),
            Technique::PauliTwirling => (0.9, 1.0, 0.5, 1.0),
            Technique::ProbabilisticErrorCancellation => (0.1, 0.5, 0.5, 1.0),
            Technique::SymmetryVerification => (0.7, 0.7, 0.7, 0.7),
        }
    }
}

/// A recommended mitigation technique with its cost and expected effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationStrategy {
    pub technique: Technique,
    pub name: String,
    pub description: String,
    /// The conditions that made this strategy applicable.
    pub conditions: Vec<String>,
    /// Multiplier on the shot budget.
    pub shot_overhead: f64,
    /// Fidelity estimate after mitigation.
    pub projected_fidelity: f64,
}

/// Strategies whose conditions all hold, best projected fidelity first.
pub fn recommend(circuit: &Circuit, provider: &ProviderConstraints) -> Vec<MitigationStrategy> {
    let metrics = MitigationMetrics::of(circuit);
    let baseline = estimate(circuit, provider);

    let mut strategies: Vec<MitigationStrategy> = Technique::ALL
        .into_iter()
        .filter_map(|technique| {
            let conditions = technique.conditions();
            if !conditions.iter().all(|c| c.holds(&metrics, provider)) {
                return None;
            }
            let (g, d, x, r) = technique.residual_errors();
            let projected = baseline.with_scaled_errors(g, d, x, r);
            Some(MitigationStrategy {
                technique,
                name: technique.name().to_string(),
                description: technique.description().to_string(),
                conditions: conditions.iter().map(ToString::to_string).collect(),
                shot_overhead: technique.shot_overhead(&baseline),
                projected_fidelity: projected.overall_fidelity,
            })
        })
        .collect();

    strategies.sort_by(|a, b| b.projected_fidelity.total_cmp(&a.projected_fidelity));
    strategies
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::QubitId;

    fn chain(num_gates: usize) -> Circuit {
        let mut c = Circuit::with_size("chain", 2, 0).unwrap();
        for i in 0..num_gates {
            c.h(QubitId(u32::try_from(i % 2).unwrap())).unwrap();
        }
        c
    }

    fn techniques(strategies: &[MitigationStrategy]) -> Vec<Technique> {
        strategies.iter().map(|s| s.technique).collect()
    }

    #[test]
    fn test_zne_requires_more_than_fifty_gates() {
        let p = ProviderConstraints::generic();
        let at_limit = recommend(&chain(50), &p);
        assert!(!techniques(&at_limit).contains(&Technique::ZeroNoiseExtrapolation));
        let above = recommend(&chain(51), &p);
        assert!(techniques(&above).contains(&Technique::ZeroNoiseExtrapolation));
    }

    #[test]
    fn test_readout_mitigation_requires_measurements() {
        let p = ProviderConstraints::generic();
        let mut c = chain(2);
        assert!(!techniques(&recommend(&c, &p)).contains(&Technique::ReadoutErrorMitigation));
        c.measure_all().unwrap();
        assert!(techniques(&recommend(&c, &p)).contains(&Technique::ReadoutErrorMitigation));
    }

    #[test]
    fn test_pec_limited_to_small_circuits() {
        let p = ProviderConstraints::generic();
        assert!(techniques(&recommend(&chain(20), &p))
            .contains(&Technique::ProbabilisticErrorCancellation));
        assert!(!techniques(&recommend(&chain(101), &p))
            .contains(&Technique::ProbabilisticErrorCancellation));
    }

    #[test]
    fn test_dynamical_decoupling_depends_on_noise_level() {
        let c = chain(30);
        let low = ProviderConstraints::quantinuum();
        let high = ProviderConstraints::rigetti();
        assert!(!techniques(&recommend(&c, &low)).contains(&Technique::DynamicalDecoupling));
        assert!(techniques(&recommend(&c, &high)).contains(&Technique::DynamicalDecoupling));
    }

    #[test]
    fn test_metrics_feed_conditions() {
        let mut c = Circuit::with_size("bell", 2, 2).unwrap();
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c.measure_all().unwrap();
        let m = MitigationMetrics::of(&c);
        assert_eq!((m.num_qubits, m.gate_count, m.two_qubit_gates, m.measurements), (2, 2, 1, 2));

        let p = ProviderConstraints::generic();
        assert!(Condition::HasMeasurements.holds(&m, &p));
        assert!(Condition::MinTwoQubitGates(1).holds(&m, &p));
        assert!(!Condition::MinGateCount(3).holds(&m, &p));
        assert!(Condition::MaxQubits(2).holds(&m, &p));
    }

    #[test]
    fn test_empty_circuit_gets_nothing() {
        let c = Circuit::with_size("empty", 1, 0).unwrap();
        assert!(recommend(&c, &ProviderConstraints::generic()).is_empty());
    }

    #[test]
    fn test_projections_never_worse_and_sorted() {
        let mut c = chain(60);
        for _ in 0..5 {
            c.cx(QubitId(0), QubitId(1)).unwrap();
        }
        c.measure_all().unwrap();
        let p = ProviderConstraints::generic();
        let baseline = estimate(&c, &p).overall_fidelity;
        let strategies = recommend(&c, &p);
        assert!(strategies.len() >= 4);
        for pair in strategies.windows(2) {
            assert!(pair[0].projected_fidelity >= pair[1].projected_fidelity);
        }
        for s in &strategies {
            assert!(s.projected_fidelity >= baseline);
            assert!(s.shot_overhead >= 1.0);
            assert!(!s.conditions.is_empty());
        }
    }

    #[test]
    fn test_condition_display_and_serde() {
        assert_eq!(Condition::MinGateCount(51).to_string(), "gate count >= 51");
        let json = serde_json::to_string(&Condition::NoiseAtLeast(NoiseLevel::High)).unwrap();
        assert_eq!(json, r#"{"condition":"noise_at_least","value":"high"}"#);
    }
}
