//! Bell and GHZ state preparation.

use std::str::FromStr;

use qforge_ir::{Circuit, IrResult, QubitId};

/// The four maximally entangled two-qubit states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BellVariant {
    /// (|00⟩ + |11⟩)/√2
    PhiPlus,
    /// (|00⟩ − |11⟩)/√2
    PhiMinus,
    /// (|01⟩ + |10⟩)/√2
    PsiPlus,
    /// (|01⟩ − |10⟩)/√2
    PsiMinus,
}

impl BellVariant {
    pub const NAMES: [&'static str; 4] = ["phi_plus", "phi_minus", "psi_plus", "psi_minus"];
}

impl FromStr for BellVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phi_plus" => Ok(BellVariant::PhiPlus),
            "phi_minus" => Ok(BellVariant::PhiMinus),
            "psi_plus" => Ok(BellVariant::PsiPlus),
            "psi_minus" => Ok(BellVariant::PsiMinus),
            other => Err(format!("unknown Bell state '{other}'")),
        }
    }
}

/// Prepare a Bell state on two qubits.
pub fn bell_state(variant: BellVariant, measure: bool) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("bell_state", 2, 0)?;
    if matches!(variant, BellVariant::PhiMinus | BellVariant::PsiMinus) {
        circuit.x(QubitId(0))?;
    }
    circuit.h(QubitId(0))?;
    circuit.cx(QubitId(0), QubitId(1))?;
    if matches!(variant, BellVariant::PsiPlus | BellVariant::PsiMinus) {
        circuit.x(QubitId(1))?;
    }
    if measure {
        circuit.measure_all()?;
    }
    Ok(circuit)
}

/// Prepare (|0…0⟩ + |1…1⟩)/√2 with a CX chain.
pub fn ghz_state(num_qubits: u32, measure: bool) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("ghz_state", num_qubits, 0)?;
    circuit.h(QubitId(0))?;
    for q in 1..num_qubits {
        circuit.cx(QubitId(q - 1), QubitId(q))?;
    }
    if measure {
        circuit.measure_all()?;
    }
    Ok(circuit)
}
