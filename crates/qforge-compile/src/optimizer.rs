//! Named-pass optimizer over the provider registry.

use std::fmt;
use std::str::FromStr;

use qforge_ir::Circuit;
use qforge_target::{ProviderConstraints, ProviderRegistry};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{CompileError, CompileResult};
use crate::manager::PassManager;
use crate::pass::Pass;
use crate::passes::{GateCancellation, GateMerging, ProviderTranspilation};
use crate::property::{DEFAULT_MAX_RULE_DEPTH, PropertySet};
use crate::report::{CircuitMetrics, Impact, PassReport};

/// The passes selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassName {
    GateCancellation,
    GateMerging,
    ProviderTranspilation,
}

impl PassName {
    /// Every selectable pass.
    pub const ALL: [PassName; 3] = [
        PassName::GateCancellation,
        PassName::GateMerging,
        PassName::ProviderTranspilation,
    ];

    /// Pipeline used when no pass is named.
    pub const DEFAULT_PIPELINE: [PassName; 3] = [
        PassName::ProviderTranspilation,
        PassName::GateMerging,
        PassName::GateCancellation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PassName::GateCancellation => "gate_cancellation",
            PassName::GateMerging => "gate_merging",
            PassName::ProviderTranspilation => "provider_transpilation",
        }
    }

    /// Short alias accepted on the command line.
    pub fn alias(self) -> &'static str {
        match self {
            PassName::GateCancellation => "cancel",
            PassName::GateMerging => "merge",
            PassName::ProviderTranspilation => "transpile",
        }
    }

    /// Instantiate the pass.
    pub fn pass(self) -> Box<dyn Pass> {
        match self {
            PassName::GateCancellation => Box::new(GateCancellation),
            PassName::GateMerging => Box::new(GateMerging),
            PassName::ProviderTranspilation => Box::new(ProviderTranspilation),
        }
    }

    /// Resolve a list of names, failing on the first unknown one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> CompileResult<Vec<PassName>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl FromStr for PassName {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        PassName::ALL
            .into_iter()
            .find(|p| p.as_str() == key || p.alias() == key)
            .ok_or_else(|| CompileError::UnknownPass(s.to_string()))
    }
}

impl fmt::Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`Optimizer::optimize`].
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub optimized_circuit: Circuit,
    /// Change from the input circuit to `optimized_circuit`.
    pub impact: Impact,
    /// One report per pass, each relative to that pass's input.
    pub passes: Vec<PassReport>,
    /// Id of the provider profile actually used.
    pub provider: String,
    pub original_fidelity: f64,
    pub optimized_fidelity: f64,
    /// Device limits the optimized circuit still exceeds.
    pub constraint_violations: Vec<String>,
}

/// Runs named passes for a provider looked up in a registry.
///
/// # Example
///
/// ```
/// use qforge_compile::Optimizer;
/// use qforge_ir::{Circuit, QubitId};
///
/// let mut circuit = Circuit::with_size("demo", 1, 0).unwrap();
/// circuit.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
///
/// let result = Optimizer::default()
///     .optimize(&circuit, "simulator", &["cancel"])
///     .unwrap();
/// assert_eq!(result.optimized_circuit.gate_count(), 1);
/// assert_eq!(circuit.gate_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    registry: ProviderRegistry,
    strict_provider: bool,
    max_rule_depth: usize,
}

impl Optimizer {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            strict_provider: false,
            max_rule_depth: DEFAULT_MAX_RULE_DEPTH,
        }
    }

    /// Fail on unknown provider ids instead of using the default profile.
    #[must_use]
    pub fn with_strict_provider(mut self, strict: bool) -> Self {
        self.strict_provider = strict;
        self
    }

    #[must_use]
    pub fn with_max_rule_depth(mut self, depth: usize) -> Self {
        self.max_rule_depth = depth;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve a provider id according to the fallback setting.
    pub fn provider(&self, provider_id: &str) -> CompileResult<&ProviderConstraints> {
        if self.strict_provider {
            Ok(self.registry.require(provider_id)?)
        } else {
            Ok(self.registry.get(provider_id))
        }
    }

    /// Run `passes` over a copy of `circuit` for the given provider.
    ///
    /// Pass names are resolved before anything runs. An empty list runs
    /// [`PassName::DEFAULT_PIPELINE`].
    #[instrument(skip(self, circuit, passes), fields(circuit = circuit.name()))]
    pub fn optimize<S: AsRef<str>>(
        &self,
        circuit: &Circuit,
        provider_id: &str,
        passes: &[S],
    ) -> CompileResult<OptimizationResult> {
        if self.max_rule_depth == 0 {
            return Err(CompileError::InvalidConfiguration(
                "max_rule_depth must be at least 1".into(),
            ));
        }
        let mut names = PassName::parse_all(passes)?;
        if names.is_empty() {
            names = PassName::DEFAULT_PIPELINE.to_vec();
        }
        let provider = self.provider(provider_id)?;
        let properties =
            PropertySet::for_provider(provider.clone()).with_max_rule_depth(self.max_rule_depth);

        let mut manager = PassManager::new();
        for name in &names {
            manager.add_boxed(name.pass());
        }
        let (optimized, reports) = manager.run(circuit, &properties)?;

        let before = CircuitMetrics::measure(circuit, provider);
        let after = CircuitMetrics::measure(&optimized, provider);
        let violations = provider.limit_violations(&optimized);
        for violation in &violations {
            warn!("Optimized circuit violates provider limits: {}", violation);
        }
        let impact = Impact::between(&before, &after);
        info!(
            "Optimized for {}: gates {} -> {}, fidelity {:.4} -> {:.4}",
            provider.id, before.gate_count, after.gate_count, before.fidelity, after.fidelity
        );

        Ok(OptimizationResult {
            optimized_circuit: optimized,
            impact,
            passes: reports,
            provider: provider.id.clone(),
            original_fidelity: before.fidelity,
            optimized_fidelity: after.fidelity,
            constraint_violations: violations,
        })
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(ProviderRegistry::builtin())
    }
}

/// Optimize with the built-in provider registry and default-profile fallback.
pub fn optimize<S: AsRef<str>>(
    circuit: &Circuit,
    provider_id: &str,
    passes: &[S],
) -> CompileResult<OptimizationResult> {
    Optimizer::default().optimize(circuit, provider_id, passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::QubitId;

    #[test]
    fn test_pass_names_and_aliases() {
        assert_eq!("cancel".parse::<PassName>().unwrap(), PassName::GateCancellation);
        assert_eq!("gate-merging".parse::<PassName>().unwrap(), PassName::GateMerging);
        assert_eq!(
            " Provider_Transpilation ".parse::<PassName>().unwrap(),
            PassName::ProviderTranspilation
        );
        assert!(matches!(
            "fuse".parse::<PassName>(),
            Err(CompileError::UnknownPass(ref n)) if n == "fuse"
        ));
        for name in PassName::ALL {
            assert_eq!(name.to_string().parse::<PassName>().unwrap(), name);
            assert_eq!(name.pass().name(), name.as_str());
        }
    }

    #[test]
    fn test_unknown_pass_fails_before_running() {
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.x(QubitId(0)).unwrap();
        let err = optimize(&c, "ibm_quantum", &["cancel", "bogus"]).unwrap_err();
        assert!(matches!(err, CompileError::UnknownPass(_)));
    }

    #[test]
    fn test_zero_rule_depth_is_rejected() {
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.h(QubitId(0)).unwrap();
        let result = Optimizer::default()
            .with_max_rule_depth(0)
            .optimize(&c, "ionq", &["transpile"]);
        assert!(matches!(result, Err(CompileError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_strict_provider() {
        let c = Circuit::with_size("t", 1, 0).unwrap();
        let none: [&str; 0] = [];
        let lenient = Optimizer::default().optimize(&c, "acme", &none).unwrap();
        assert_eq!(lenient.provider, "generic");

        let strict = Optimizer::default().with_strict_provider(true);
        assert!(matches!(
            strict.optimize(&c, "acme", &none),
            Err(CompileError::Target(_))
        ));
    }

    #[test]
    fn test_limit_violations_reported() {
        let mut c = Circuit::with_size("wide", 40, 0).unwrap();
        c.h(QubitId(39)).unwrap();
        let result = optimize(&c, "ionq", &["cancel"]).unwrap();
        assert_eq!(result.constraint_violations.len(), 1);
        assert!(result.constraint_violations[0].contains("qubits"));
    }

    #[test]
    fn test_result_serializes() {
        let mut c = Circuit::with_size("t", 2, 0).unwrap();
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let result = optimize(&c, "google", &["transpile"]).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["provider"], "google_quantum_ai");
        assert_eq!(json["passes"][0]["pass"], "provider_transpilation");
        assert!(json["impact"]["gate_reduction"].is_number());
    }
}
