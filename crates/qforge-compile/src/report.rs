//! Impact metrics comparing two versions of a circuit.

use qforge_ir::Circuit;
use qforge_noise::estimate;
use qforge_target::ProviderConstraints;
use serde::{Deserialize, Serialize};

/// Size and cost figures of one circuit on one provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitMetrics {
    pub gate_count: usize,
    pub two_qubit_gates: usize,
    pub depth: usize,
    pub fidelity: f64,
    pub execution_time_ns: f64,
}

impl CircuitMetrics {
    pub fn measure(circuit: &Circuit, provider: &ProviderConstraints) -> Self {
        let estimate = estimate(circuit, provider);
        Self {
            gate_count: circuit.gate_count(),
            two_qubit_gates: circuit.two_qubit_gate_count(),
            depth: circuit.depth(),
            fidelity: estimate.overall_fidelity,
            execution_time_ns: estimate.execution_time_ns,
        }
    }
}

/// Change from a `before` circuit to an `after` circuit.
///
/// Reductions and cost savings are percentages of the `before` figure and
/// go negative when the circuit grew. `fidelity_improvement` is the change
/// in estimated fidelity in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Impact {
    pub gate_reduction: f64,
    pub depth_reduction: f64,
    pub fidelity_improvement: f64,
    pub cost_savings: f64,
}

impl Impact {
    #[allow(clippy::cast_precision_loss)]
    pub fn between(before: &CircuitMetrics, after: &CircuitMetrics) -> Self {
        Self {
            gate_reduction: percent_reduction(before.gate_count as f64, after.gate_count as f64),
            depth_reduction: percent_reduction(before.depth as f64, after.depth as f64),
            fidelity_improvement: (after.fidelity - before.fidelity) * 100.0,
            cost_savings: percent_reduction(before.execution_time_ns, after.execution_time_ns),
        }
    }
}

fn percent_reduction(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        (before - after) / before * 100.0
    } else {
        0.0
    }
}

/// What one pass did, measured against the circuit it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub pass: String,
    pub before: CircuitMetrics,
    pub after: CircuitMetrics,
    pub impact: Impact,
}

impl PassReport {
    pub fn new(pass: impl Into<String>, before: CircuitMetrics, after: CircuitMetrics) -> Self {
        Self {
            pass: pass.into(),
            impact: Impact::between(&before, &after),
            before,
            after,
        }
    }
}
