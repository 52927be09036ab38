//! Pass manager for running a pipeline of passes.

use qforge_ir::Circuit;
use tracing::{debug, info, instrument};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::report::{CircuitMetrics, PassReport};

/// Runs a sequence of passes, one report per pass.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Append a pass to the pipeline.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Append a boxed pass to the pipeline.
    pub fn add_boxed(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Run every pass over a copy of `circuit`.
    ///
    /// Each pass gets a DAG rebuilt from the previous pass's output, and its
    /// report compares that output with the circuit it received.
    #[instrument(skip_all, fields(circuit = circuit.name(), provider = %properties.provider.id))]
    pub fn run(
        &self,
        circuit: &Circuit,
        properties: &PropertySet,
    ) -> CompileResult<(Circuit, Vec<PassReport>)> {
        info!(
            "Running {} passes on circuit with {} qubits and {} gates",
            self.passes.len(),
            circuit.num_qubits(),
            circuit.gate_count()
        );

        let mut current = circuit.clone();
        let mut reports = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let before = CircuitMetrics::measure(&current, &properties.provider);
            let mut dag = current.to_dag()?;
            if pass.should_run(&dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(&mut dag, properties)?;
                current = Circuit::from_dag(current.name(), &dag)?;
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
            let after = CircuitMetrics::measure(&current, &properties.provider);
            debug!(
                "Pass {} completed, gates {} -> {}, depth {} -> {}",
                pass.name(),
                before.gate_count,
                after.gate_count,
                before.depth,
                after.depth
            );
            reports.push(PassReport::new(pass.name(), before, after));
        }

        info!(
            "Pass manager completed, final depth: {}, gates: {}",
            current.depth(),
            current.gate_count()
        );
        Ok((current, reports))
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::GateCancellation;
    use qforge_ir::QubitId;
    use qforge_target::ProviderConstraints;

    #[test]
    fn test_empty_manager_returns_copy() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        let mut circuit = Circuit::with_size("test", 2, 0).unwrap();
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let props = PropertySet::for_provider(ProviderConstraints::generic());
        let (out, reports) = pm.run(&circuit, &props).unwrap();
        assert_eq!(out, circuit);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_reports_are_relative_to_pass_input() {
        let mut pm = PassManager::new();
        pm.add_pass(GateCancellation);
        pm.add_pass(GateCancellation);
        assert_eq!(pm.len(), 2);

        let mut circuit = Circuit::with_size("test", 1, 0).unwrap();
        circuit.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        let props = PropertySet::for_provider(ProviderConstraints::generic());
        let (out, reports) = pm.run(&circuit, &props).unwrap();

        assert_eq!(out.gate_count(), 1);
        assert_eq!(reports[0].before.gate_count, 3);
        assert_eq!(reports[0].after.gate_count, 1);
        assert_eq!(reports[1].before.gate_count, 1);
        assert_eq!(reports[1].impact.gate_reduction, 0.0);
        // The input is untouched.
        assert_eq!(circuit.gate_count(), 3);
    }
}
