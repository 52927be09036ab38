//! Native gate sets.

use qforge_ir::{GATE_NAMES, StandardGate, canonical_name};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of gates a provider executes without decomposition.
///
/// Names are stored in canonical form, so `cnot` and `cx` are the same
/// entry. Measurement, reset and barrier are not gates and are always
/// accepted by every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GateSet {
    gates: BTreeSet<String>,
}

impl GateSet {
    /// Create a gate set from gate names.
    pub fn new(gates: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            gates: gates
                .into_iter()
                .map(|g| {
                    let g = g.as_ref();
                    canonical_name(g).unwrap_or(g).to_string()
                })
                .collect(),
        }
    }

    /// Every gate in the vocabulary.
    pub fn universal() -> Self {
        Self::new(GATE_NAMES.iter().copied())
    }

    /// IBM superconducting basis (RZ + SX + X + CX).
    pub fn ibm() -> Self {
        Self::new(["rz", "sx", "x", "cx", "id"])
    }

    /// Google basis (Rx + Ry + Rz + CZ).
    pub fn google() -> Self {
        Self::new(["rx", "ry", "rz", "cz"])
    }

    /// Trapped-ion basis with an Ising ZZ interaction (Rx + Ry + Rz + RZZ).
    pub fn ionq() -> Self {
        Self::new(["rx", "ry", "rz", "rzz"])
    }

    /// Rigetti basis (Rx + Rz + CZ).
    pub fn rigetti() -> Self {
        Self::new(["rx", "rz", "cz"])
    }

    /// Quantinuum basis (Rz + Rx + RZZ).
    pub fn quantinuum() -> Self {
        Self::new(["rz", "rx", "rzz"])
    }

    /// Check if a gate name is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains(canonical_name(name).unwrap_or(name))
    }

    /// Check if a gate runs natively.
    pub fn supports(&self, gate: &StandardGate) -> bool {
        self.gates.contains(gate.name())
    }

    /// True when every gate in the vocabulary is native.
    pub fn is_universal(&self) -> bool {
        GATE_NAMES.iter().all(|g| self.gates.contains(*g))
    }

    /// Gate names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.gates.iter().map(String::as_str)
    }

    /// Number of gates in the set.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl From<Vec<String>> for GateSet {
    fn from(gates: Vec<String>) -> Self {
        Self::new(gates)
    }
}

impl From<GateSet> for Vec<String> {
    fn from(set: GateSet) -> Self {
        set.gates.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_canonicalised() {
        let set = GateSet::new(["cnot", "p", "rz"]);
        assert!(set.contains("cx"));
        assert!(set.contains("CX"));
        assert!(set.supports(&StandardGate::U1(0.3)));
        assert!(!set.supports(&StandardGate::H));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_universal() {
        let set = GateSet::universal();
        assert!(set.is_universal());
        assert!(set.supports(&StandardGate::CSwap));
        assert!(!GateSet::ibm().is_universal());
    }

    #[test]
    fn test_serde_as_list() {
        let set = GateSet::rigetti();
        let yaml = serde_yaml_ng::to_string(&set).unwrap();
        let back: GateSet = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, set);
        let names: Vec<&str> = set.iter().collect();
        assert_eq!(names, vec!["cz", "rx", "rz"]);
    }
}
