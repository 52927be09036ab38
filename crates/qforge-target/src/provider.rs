//! Provider constraint profiles.

use qforge_ir::{Circuit, Instruction, InstructionKind, StandardGate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TargetError, TargetResult};
use crate::gate_set::GateSet;

/// Coarse noise classification of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for NoiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoiseLevel::Low => "low",
            NoiseLevel::Medium => "medium",
            NoiseLevel::High => "high",
        };
        f.write_str(s)
    }
}

fn default_measure_time_ns() -> f64 {
    1_000.0
}

/// Hardware limits and noise characteristics of a provider.
///
/// Error rates are probabilities in `[0, 1)`. Times are in nanoseconds
/// except the coherence times `t1_us` and `t2_us`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConstraints {
    /// Registry key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Largest circuit width the device accepts.
    pub max_qubits: u32,
    /// Largest circuit depth the device accepts.
    pub max_depth: usize,
    /// Largest gate count the device accepts.
    pub max_gate_count: usize,
    pub noise_level: NoiseLevel,
    /// Gates executed without decomposition.
    pub native_gates: GateSet,
    /// Duration of a single-qubit gate.
    pub avg_gate_time_ns: f64,
    /// Duration of a two-qubit gate.
    pub two_qubit_gate_time_ns: f64,
    /// Duration of a measurement or reset.
    #[serde(default = "default_measure_time_ns")]
    pub measure_time_ns: f64,
    pub single_qubit_error: f64,
    pub two_qubit_error: f64,
    pub readout_error: f64,
    /// Energy relaxation time.
    pub t1_us: f64,
    /// Dephasing time.
    pub t2_us: f64,
    /// Extra error per additional concurrent two-qubit gate in a layer.
    pub crosstalk: f64,
}

impl ProviderConstraints {
    /// IBM Quantum superconducting processors.
    pub fn ibm_quantum() -> Self {
        Self {
            id: "ibm_quantum".into(),
            name: "IBM Quantum".into(),
            max_qubits: 127,
            max_depth: 5_000,
            max_gate_count: 100_000,
            noise_level: NoiseLevel::Medium,
            native_gates: GateSet::ibm(),
            avg_gate_time_ns: 35.0,
            two_qubit_gate_time_ns: 300.0,
            measure_time_ns: 1_500.0,
            single_qubit_error: 3e-4,
            two_qubit_error: 8e-3,
            readout_error: 1.5e-2,
            t1_us: 250.0,
            t2_us: 150.0,
            crosstalk: 0.01,
        }
    }

    /// Google Quantum AI superconducting processors.
    pub fn google_quantum_ai() -> Self {
        Self {
            id: "google_quantum_ai".into(),
            name: "Google Quantum AI".into(),
            max_qubits: 72,
            max_depth: 2_000,
            max_gate_count: 50_000,
            noise_level: NoiseLevel::Medium,
            native_gates: GateSet::google(),
            avg_gate_time_ns: 25.0,
            two_qubit_gate_time_ns: 32.0,
            measure_time_ns: 1_000.0,
            single_qubit_error: 1e-3,
            two_qubit_error: 6e-3,
            readout_error: 2e-2,
            t1_us: 20.0,
            t2_us: 15.0,
            crosstalk: 0.015,
        }
    }

    /// IonQ trapped-ion systems.
    pub fn ionq() -> Self {
        Self {
            id: "ionq".into(),
            name: "IonQ".into(),
            max_qubits: 36,
            max_depth: 1_000,
            max_gate_count: 20_000,
            noise_level: NoiseLevel::Low,
            native_gates: GateSet::ionq(),
            avg_gate_time_ns: 135_000.0,
            two_qubit_gate_time_ns: 600_000.0,
            measure_time_ns: 300_000.0,
            single_qubit_error: 5e-4,
            two_qubit_error: 4e-3,
            readout_error: 4e-3,
            t1_us: 1e7,
            t2_us: 1e6,
            crosstalk: 0.001,
        }
    }

    /// Rigetti superconducting processors.
    pub fn rigetti() -> Self {
        Self {
            id: "rigetti".into(),
            name: "Rigetti".into(),
            max_qubits: 84,
            max_depth: 1_000,
            max_gate_count: 20_000,
            noise_level: NoiseLevel::High,
            native_gates: GateSet::rigetti(),
            avg_gate_time_ns: 40.0,
            two_qubit_gate_time_ns: 70.0,
            measure_time_ns: 2_000.0,
            single_qubit_error: 1e-3,
            two_qubit_error: 1.5e-2,
            readout_error: 3e-2,
            t1_us: 30.0,
            t2_us: 20.0,
            crosstalk: 0.02,
        }
    }

    /// Quantinuum trapped-ion systems.
    pub fn quantinuum() -> Self {
        Self {
            id: "quantinuum".into(),
            name: "Quantinuum".into(),
            max_qubits: 56,
            max_depth: 2_000,
            max_gate_count: 20_000,
            noise_level: NoiseLevel::Low,
            native_gates: GateSet::quantinuum(),
            avg_gate_time_ns: 10_000.0,
            two_qubit_gate_time_ns: 25_000.0,
            measure_time_ns: 60_000.0,
            single_qubit_error: 3e-5,
            two_qubit_error: 2e-3,
            readout_error: 2e-3,
            t1_us: 6e7,
            t2_us: 3e6,
            crosstalk: 5e-4,
        }
    }

    /// Noise-free statevector simulator.
    pub fn simulator() -> Self {
        Self {
            id: "simulator".into(),
            name: "Ideal Simulator".into(),
            max_qubits: 32,
            max_depth: 1_000_000,
            max_gate_count: 10_000_000,
            noise_level: NoiseLevel::Low,
            native_gates: GateSet::universal(),
            avg_gate_time_ns: 1.0,
            two_qubit_gate_time_ns: 1.0,
            measure_time_ns: 1.0,
            single_qubit_error: 0.0,
            two_qubit_error: 0.0,
            readout_error: 0.0,
            t1_us: 1e12,
            t2_us: 1e12,
            crosstalk: 0.0,
        }
    }

    /// Default profile for providers without a dedicated entry.
    pub fn generic() -> Self {
        Self {
            id: "generic".into(),
            name: "Generic NISQ device".into(),
            max_qubits: 50,
            max_depth: 1_000,
            max_gate_count: 10_000,
            noise_level: NoiseLevel::Medium,
            native_gates: GateSet::universal(),
            avg_gate_time_ns: 50.0,
            two_qubit_gate_time_ns: 300.0,
            measure_time_ns: 1_000.0,
            single_qubit_error: 1e-3,
            two_qubit_error: 1e-2,
            readout_error: 2e-2,
            t1_us: 100.0,
            t2_us: 80.0,
            crosstalk: 0.01,
        }
    }

    /// Check if a gate runs natively on this provider.
    pub fn supports(&self, gate: &StandardGate) -> bool {
        self.native_gates.supports(gate)
    }

    /// Error probability of one application of `gate`.
    ///
    /// A three-qubit gate counts as six two-qubit gates.
    pub fn gate_error(&self, gate: &StandardGate) -> f64 {
        match gate.num_qubits() {
            1 => self.single_qubit_error,
            2 => self.two_qubit_error,
            _ => 1.0 - (1.0 - self.two_qubit_error).powi(6),
        }
    }

    /// Duration of an instruction in nanoseconds. Barriers take no time.
    pub fn duration_ns(&self, instruction: &Instruction) -> f64 {
        match &instruction.kind {
            InstructionKind::Gate(gate) => match gate.num_qubits() {
                1 => self.avg_gate_time_ns,
                2 => self.two_qubit_gate_time_ns,
                _ => 6.0 * self.two_qubit_gate_time_ns,
            },
            InstructionKind::Measure | InstructionKind::Reset => self.measure_time_ns,
            InstructionKind::Barrier => 0.0,
        }
    }

    /// Describe every device limit the circuit exceeds.
    pub fn limit_violations(&self, circuit: &Circuit) -> Vec<String> {
        let mut violations = Vec::new();
        if circuit.num_qubits() > self.max_qubits {
            violations.push(format!(
                "circuit uses {} qubits, {} supports at most {}",
                circuit.num_qubits(),
                self.name,
                self.max_qubits
            ));
        }
        let depth = circuit.depth();
        if depth > self.max_depth {
            violations.push(format!(
                "circuit depth {depth} exceeds {} limit of {}",
                self.name, self.max_depth
            ));
        }
        let gates = circuit.gate_count();
        if gates > self.max_gate_count {
            violations.push(format!(
                "gate count {gates} exceeds {} limit of {}",
                self.name, self.max_gate_count
            ));
        }
        violations
    }

    /// Check that rates are probabilities and durations are positive.
    pub fn validate(&self) -> TargetResult<()> {
        let invalid = |message: String| TargetError::InvalidProfile {
            id: self.id.clone(),
            message,
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".into()));
        }
        if self.max_qubits == 0 {
            return Err(invalid("max_qubits must be positive".into()));
        }
        for (field, value) in [
            ("single_qubit_error", self.single_qubit_error),
            ("two_qubit_error", self.two_qubit_error),
            ("readout_error", self.readout_error),
            ("crosstalk", self.crosstalk),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(invalid(format!("{field} must be in [0, 1), got {value}")));
            }
        }
        for (field, value) in [
            ("avg_gate_time_ns", self.avg_gate_time_ns),
            ("two_qubit_gate_time_ns", self.two_qubit_gate_time_ns),
            ("measure_time_ns", self.measure_time_ns),
            ("t1_us", self.t1_us),
            ("t2_us", self.t2_us),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{field} must be positive, got {value}")));
            }
        }
        if self.native_gates.is_empty() {
            return Err(invalid("native_gates must not be empty".into()));
        }
        Ok(())
    }
}
