//! Analytic fidelity estimation.

use qforge_ir::Circuit;
use qforge_target::{ProviderConstraints, ProviderRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mitigation::{self, MitigationStrategy};
use crate::schedule::Schedule;

/// Lower bound of any fidelity estimate.
pub const MIN_FIDELITY: f64 = 1e-9;

/// Estimated success probability of a circuit on a provider.
///
/// Each `*_error` field is `1 - term` for one factor of the product that
/// makes up `overall_fidelity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FidelityEstimate {
    /// Provider the estimate was made for.
    pub provider: String,
    /// Product of all terms, in `[MIN_FIDELITY, 1]`.
    pub overall_fidelity: f64,
    /// `1 - overall_fidelity`.
    pub total_error: f64,
    pub gate_error: f64,
    pub decoherence_error: f64,
    pub crosstalk_error: f64,
    pub readout_error: f64,
    /// Duration of the ASAP schedule.
    pub execution_time_ns: f64,
}

impl FidelityEstimate {
    /// Estimate with each error term scaled by the matching factor.
    ///
    /// A factor of `0.5` halves that error term, `1.0` leaves it unchanged.
    pub fn with_scaled_errors(
        &self,
        gate: f64,
        decoherence: f64,
        crosstalk: f64,
        readout: f64,
    ) -> Self {
        let gate_error = self.gate_error * gate;
        let decoherence_error = self.decoherence_error * decoherence;
        let crosstalk_error = self.crosstalk_error * crosstalk;
        let readout_error = self.readout_error * readout;
        let overall = combine(gate_error, decoherence_error, crosstalk_error, readout_error);
        Self {
            provider: self.provider.clone(),
            overall_fidelity: overall,
            total_error: 1.0 - overall,
            gate_error,
            decoherence_error,
            crosstalk_error,
            readout_error,
            execution_time_ns: self.execution_time_ns,
        }
    }
}

fn combine(gate: f64, decoherence: f64, crosstalk: f64, readout: f64) -> f64 {
    ((1.0 - gate) * (1.0 - decoherence) * (1.0 - crosstalk) * (1.0 - readout))
        .clamp(MIN_FIDELITY, 1.0)
}

/// Estimate the fidelity of `circuit` on `provider`.
///
/// The estimate is the product of four independent terms:
///
/// | Term | Factor |
/// |------|--------|
/// | gate | `∏ (1 - e_gate)` over gates |
/// | readout | `(1 - e_readout)` per measurement |
/// | decoherence | `exp(-τ/T1) · exp(-τ/T2)` per active qubit, τ the schedule length |
/// | crosstalk | `(1 - c)^(k-1)` per layer with `k > 1` multi-qubit gates |
///
/// Each term only shrinks as instructions are appended, so the estimate is
/// non-increasing in gate count and depth.
pub fn estimate(circuit: &Circuit, provider: &ProviderConstraints) -> FidelityEstimate {
    let gate_term: f64 = circuit
        .gates()
        .filter_map(|inst| inst.as_gate())
        .map(|g| 1.0 - provider.gate_error(g))
        .product();

    // Repeated factors are evaluated as exp(count * ln(factor)), which is
    // monotone in the count.
    #[allow(clippy::cast_precision_loss)]
    let measurements = circuit
        .measurements()
        .map(|m| m.qubits.len())
        .sum::<usize>() as f64;
    let readout_term = (measurements * (-provider.readout_error).ln_1p()).exp();

    let schedule = Schedule::asap(circuit, provider);
    let tau_us = schedule.duration_ns / 1_000.0;
    #[allow(clippy::cast_precision_loss)]
    let active = circuit.active_qubits() as f64;
    let decoherence_term = (-active * tau_us * (1.0 / provider.t1_us + 1.0 / provider.t2_us)).exp();

    #[allow(clippy::cast_precision_loss)]
    let concurrent_extra = schedule
        .multi_qubit_gates_per_layer
        .iter()
        .map(|k| k.saturating_sub(1))
        .sum::<usize>() as f64;
    let crosstalk_term = (concurrent_extra * (-provider.crosstalk).ln_1p()).exp();

    let overall =
        (gate_term * readout_term * decoherence_term * crosstalk_term).clamp(MIN_FIDELITY, 1.0);
    debug!(
        "Fidelity of '{}' on {}: {:.6} (gate {:.6}, decoherence {:.6}, crosstalk {:.6}, readout {:.6})",
        circuit.name(),
        provider.id,
        overall,
        gate_term,
        decoherence_term,
        crosstalk_term,
        readout_term
    );

    FidelityEstimate {
        provider: provider.id.clone(),
        overall_fidelity: overall,
        total_error: 1.0 - overall,
        gate_error: 1.0 - gate_term,
        decoherence_error: 1.0 - decoherence_term,
        crosstalk_error: 1.0 - crosstalk_term,
        readout_error: 1.0 - readout_term,
        execution_time_ns: schedule.duration_ns,
    }
}

/// Fidelity estimation and mitigation advice keyed by provider id.
///
/// Provider ids are resolved through a [`ProviderRegistry`], so unknown ids
/// use the default profile.
#[derive(Debug, Clone, Default)]
pub struct NoiseModeler {
    registry: ProviderRegistry,
}

impl NoiseModeler {
    /// Create a modeler over the given registry.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// The registry used to resolve provider ids.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Estimate the fidelity of `circuit` on the named provider.
    pub fn estimate_fidelity(&self, circuit: &Circuit, provider_id: &str) -> FidelityEstimate {
        estimate(circuit, self.registry.get(provider_id))
    }

    /// Estimate the fidelity of `circuit` on an explicit profile.
    pub fn estimate_for(
        &self,
        circuit: &Circuit,
        provider: &ProviderConstraints,
    ) -> FidelityEstimate {
        estimate(circuit, provider)
    }

    /// Mitigation strategies whose conditions all hold for this circuit.
    pub fn get_error_mitigation_strategies(
        &self,
        circuit: &Circuit,
        provider_id: &str,
    ) -> Vec<MitigationStrategy> {
        mitigation::recommend(circuit, self.registry.get(provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::{ClbitId, QubitId};

    fn bell() -> Circuit {
        let mut c = Circuit::with_size("bell", 2, 2).unwrap();
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c.measure_all().unwrap();
        c
    }

    #[test]
    fn test_empty_circuit_is_perfect() {
        let c = Circuit::with_size("empty", 3, 0).unwrap();
        let e = estimate(&c, &ProviderConstraints::rigetti());
        assert_eq!(e.overall_fidelity, 1.0);
        assert_eq!(e.total_error, 0.0);
    }

    #[test]
    fn test_simulator_has_no_gate_or_readout_error() {
        let e = NoiseModeler::default().estimate_fidelity(&bell(), "simulator");
        assert_eq!(e.gate_error, 0.0);
        assert_eq!(e.readout_error, 0.0);
        assert!(e.overall_fidelity > 0.999_999);
    }

    #[test]
    fn test_terms_multiply() {
        let p = ProviderConstraints::generic();
        let e = estimate(&bell(), &p);
        let gate = (1.0 - p.single_qubit_error) * (1.0 - p.two_qubit_error);
        assert!((1.0 - e.gate_error - gate).abs() < 1e-12);
        let readout = (1.0 - p.readout_error).powi(2);
        assert!((1.0 - e.readout_error - readout).abs() < 1e-12);
        let product = (1.0 - e.gate_error)
            * (1.0 - e.decoherence_error)
            * (1.0 - e.crosstalk_error)
            * (1.0 - e.readout_error);
        assert!((product - e.overall_fidelity).abs() < 1e-12);
    }

    #[test]
    fn test_crosstalk_only_with_concurrent_two_qubit_gates() {
        let p = ProviderConstraints::generic();
        let mut serial = Circuit::with_size("serial", 3, 0).unwrap();
        serial.cx(QubitId(0), QubitId(1)).unwrap().cx(QubitId(1), QubitId(2)).unwrap();
        assert_eq!(estimate(&serial, &p).crosstalk_error, 0.0);

        let mut parallel = Circuit::with_size("parallel", 4, 0).unwrap();
        parallel.cx(QubitId(0), QubitId(1)).unwrap().cx(QubitId(2), QubitId(3)).unwrap();
        let e = estimate(&parallel, &p);
        assert!((e.crosstalk_error - p.crosstalk).abs() < 1e-12);
    }

    #[test]
    fn test_noisier_provider_scores_lower() {
        let modeler = NoiseModeler::default();
        let mut c = bell();
        c.measure(QubitId(0), ClbitId(0)).unwrap();
        let quantinuum = modeler.estimate_fidelity(&c, "quantinuum");
        let rigetti = modeler.estimate_fidelity(&c, "rigetti");
        assert!(quantinuum.overall_fidelity > rigetti.overall_fidelity);
    }

    #[test]
    fn test_unknown_provider_uses_default_profile() {
        let modeler = NoiseModeler::default();
        let unknown = modeler.estimate_fidelity(&bell(), "no_such_provider");
        let generic = modeler.estimate_fidelity(&bell(), "generic");
        assert_eq!(unknown, generic);
    }

    #[test]
    fn test_scaled_errors() {
        let e = estimate(&bell(), &ProviderConstraints::rigetti());
        let same = e.with_scaled_errors(1.0, 1.0, 1.0, 1.0);
        assert!((same.overall_fidelity - e.overall_fidelity).abs() < 1e-12);
        let better = e.with_scaled_errors(0.5, 1.0, 1.0, 0.0);
        assert_eq!(better.readout_error, 0.0);
        assert!(better.overall_fidelity > e.overall_fidelity);
    }
}
