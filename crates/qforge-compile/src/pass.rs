//! The pass trait.

use qforge_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// A transformation over a circuit DAG.
///
/// Passes read the target from the [`PropertySet`] and rewrite the DAG in
/// place. The pass manager hands each pass a fresh DAG built from a copy of
/// the circuit, so a pass never sees the caller's circuit.
pub trait Pass: Send + Sync {
    /// Name reported in pass reports and logs.
    fn name(&self) -> &str;

    /// Rewrite the DAG.
    fn run(&self, dag: &mut CircuitDag, properties: &PropertySet) -> CompileResult<()>;

    /// Skip the pass when it cannot change anything.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_target::ProviderConstraints;

    struct Noop;

    impl Pass for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn run(&self, _dag: &mut CircuitDag, _properties: &PropertySet) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_should_run() {
        let dag = CircuitDag::with_size(1, 0);
        let props = PropertySet::for_provider(ProviderConstraints::generic());
        assert!(Noop.should_run(&dag, &props));
        assert_eq!(Noop.name(), "noop");
    }
}
