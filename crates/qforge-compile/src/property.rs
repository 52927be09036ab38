//! Shared context handed to every pass.

use qforge_target::{GateSet, ProviderConstraints};

use crate::unitary::OneQubitBasis;

/// Default bound on nested rewrite-rule expansions.
pub const DEFAULT_MAX_RULE_DEPTH: usize = 8;

/// Target information passes read while transforming a circuit.
///
/// # Example
///
/// ```
/// use qforge_compile::{OneQubitBasis, PropertySet};
/// use qforge_target::ProviderConstraints;
///
/// let props = PropertySet::for_provider(ProviderConstraints::ibm_quantum());
/// assert_eq!(props.basis, Some(OneQubitBasis::Zsx));
///
/// let props = PropertySet::for_provider(ProviderConstraints::rigetti());
/// assert_eq!(props.basis, Some(OneQubitBasis::Zxz));
/// ```
#[derive(Debug, Clone)]
pub struct PropertySet {
    /// The provider being compiled for.
    pub provider: ProviderConstraints,
    /// One-qubit basis available in the provider's native gates.
    pub basis: Option<OneQubitBasis>,
    /// Maximum nesting of rewrite rules during transpilation.
    pub max_rule_depth: usize,
}

impl PropertySet {
    pub fn for_provider(provider: ProviderConstraints) -> Self {
        let basis = basis_for(&provider.native_gates);
        Self {
            provider,
            basis,
            max_rule_depth: DEFAULT_MAX_RULE_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_rule_depth(mut self, depth: usize) -> Self {
        self.max_rule_depth = depth;
        self
    }
}

/// Pick the shortest one-qubit basis the gate set can express.
pub fn basis_for(gates: &GateSet) -> Option<OneQubitBasis> {
    if gates.contains("u3") {
        Some(OneQubitBasis::U3)
    } else if gates.contains("rz") && gates.contains("ry") {
        Some(OneQubitBasis::Zyz)
    } else if gates.contains("rz") && gates.contains("rx") {
        Some(OneQubitBasis::Zxz)
    } else if gates.contains("rz") && gates.contains("sx") {
        Some(OneQubitBasis::Zsx)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_selection() {
        assert_eq!(basis_for(&GateSet::universal()), Some(OneQubitBasis::U3));
        assert_eq!(basis_for(&GateSet::google()), Some(OneQubitBasis::Zyz));
        assert_eq!(basis_for(&GateSet::ionq()), Some(OneQubitBasis::Zyz));
        assert_eq!(basis_for(&GateSet::quantinuum()), Some(OneQubitBasis::Zxz));
        assert_eq!(basis_for(&GateSet::ibm()), Some(OneQubitBasis::Zsx));
        assert_eq!(basis_for(&GateSet::new(["cx", "h"])), None);
    }
}
