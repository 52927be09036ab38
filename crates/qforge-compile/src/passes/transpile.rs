//! Provider transpilation.
//!
//! Every gate outside the provider's native set is rewritten through a small
//! rule library until only native gates remain:
//!
//! | Gate | Rewrites |
//! |------|----------|
//! | one-qubit | provider basis (`u3`, ZYZ, ZXZ, ZSX), `rz` ↔ `u1` |
//! | `cx` | `h · cz · h` |
//! | `cz` | `h · cx · h`, `rz ⊗ rz · rzz(-π/2)` |
//! | `cy`, `ch`, `swap`, `crz`, `cp`, `rzz` | `cx` plus one-qubit gates |
//! | `ccx` | six `cx` with `h`, `t`, `tdg` |
//! | `cswap` | `cx · ccx · cx` |
//!
//! Rules are tried in order and expanded recursively up to the property
//! set's depth limit. A rule that would re-enter a gate already being
//! expanded is skipped, so `cx → cz → cx` cycles fall through to the next
//! alternative.

use qforge_ir::{CircuitDag, Instruction, QubitId, StandardGate};
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::unitary::Unitary2x2;

/// A gate placed on operand positions of the gate being rewritten.
type Step = (StandardGate, &'static [usize]);

/// Rewrites non-native gates into the provider's native gate set.
pub struct ProviderTranspilation;

const C: &[usize] = &[0];
const T: &[usize] = &[1];
const CT: &[usize] = &[0, 1];
const TC: &[usize] = &[1, 0];

/// Alternative rewrites of a gate in terms of other gates.
fn rules(gate: &StandardGate) -> Vec<Vec<Step>> {
    use StandardGate as G;
    match *gate {
        G::I => vec![vec![]],
        G::Rz(theta) => vec![vec![(G::U1(theta), C)]],
        G::U1(lambda) => vec![vec![(G::Rz(lambda), C)]],
        G::CX => vec![vec![(G::H, T), (G::CZ, CT), (G::H, T)]],
        G::CZ => vec![
            vec![(G::H, T), (G::CX, CT), (G::H, T)],
            vec![
                (G::Rz(FRAC_PI_2), C),
                (G::Rz(FRAC_PI_2), T),
                (G::RZZ(-FRAC_PI_2), CT),
            ],
        ],
        G::CY => vec![vec![(G::Sdg, T), (G::CX, CT), (G::S, T)]],
        G::CH => vec![vec![
            (G::S, T),
            (G::H, T),
            (G::T, T),
            (G::CX, CT),
            (G::Tdg, T),
            (G::H, T),
            (G::Sdg, T),
        ]],
        G::Swap => vec![vec![(G::CX, CT), (G::CX, TC), (G::CX, CT)]],
        G::CRz(theta) => vec![vec![
            (G::Rz(theta / 2.0), T),
            (G::CX, CT),
            (G::Rz(-theta / 2.0), T),
            (G::CX, CT),
        ]],
        G::CP(lambda) => vec![vec![
            (G::U1(lambda / 2.0), C),
            (G::CX, CT),
            (G::U1(-lambda / 2.0), T),
            (G::CX, CT),
            (G::U1(lambda / 2.0), T),
        ]],
        G::RZZ(theta) => vec![vec![(G::CX, CT), (G::Rz(theta), T), (G::CX, CT)]],
        G::CCX => {
            const A: &[usize] = &[0];
            const B: &[usize] = &[1];
            const Z: &[usize] = &[2];
            vec![vec![
                (G::H, Z),
                (G::CX, &[1, 2]),
                (G::Tdg, Z),
                (G::CX, &[0, 2]),
                (G::T, Z),
                (G::CX, &[1, 2]),
                (G::Tdg, Z),
                (G::CX, &[0, 2]),
                (G::T, B),
                (G::T, Z),
                (G::H, Z),
                (G::CX, &[0, 1]),
                (G::T, A),
                (G::Tdg, B),
                (G::CX, &[0, 1]),
            ]]
        }
        G::CSwap => vec![vec![(G::CX, &[2, 1]), (G::CCX, &[0, 1, 2]), (G::CX, &[2, 1])]],
        _ => vec![],
    }
}

struct Rewriter<'a> {
    properties: &'a PropertySet,
    expanding: Vec<&'static str>,
}

impl Rewriter<'_> {
    /// Native gates implementing `gate` on `qubits`, `None` when no rule chain exists.
    fn rewrite(
        &mut self,
        gate: StandardGate,
        qubits: &[QubitId],
        depth: usize,
    ) -> Option<Vec<(StandardGate, Vec<QubitId>)>> {
        if self.properties.provider.supports(&gate) {
            return Some(vec![(gate, qubits.to_vec())]);
        }
        if depth >= self.properties.max_rule_depth || self.expanding.contains(&gate.name()) {
            return None;
        }

        if let (Some(basis), Some(u)) = (self.properties.basis, Unitary2x2::from_gate(&gate)) {
            let synthesized = basis.synthesize_unitary(&u);
            if synthesized.iter().all(|g| self.properties.provider.supports(g)) {
                return Some(synthesized.into_iter().map(|g| (g, qubits.to_vec())).collect());
            }
        }

        self.expanding.push(gate.name());
        let result = rules(&gate)
            .into_iter()
            .find_map(|rule| self.expand(&rule, qubits, depth));
        self.expanding.pop();
        result
    }

    fn expand(
        &mut self,
        rule: &[Step],
        qubits: &[QubitId],
        depth: usize,
    ) -> Option<Vec<(StandardGate, Vec<QubitId>)>> {
        let mut out = Vec::new();
        for (gate, positions) in rule {
            let operands: Vec<QubitId> = positions.iter().map(|p| qubits[*p]).collect();
            out.extend(self.rewrite(*gate, &operands, depth + 1)?);
        }
        Some(out)
    }
}

/// Native replacement for one gate.
pub fn transpile_gate(
    gate: StandardGate,
    qubits: &[QubitId],
    properties: &PropertySet,
) -> CompileResult<Vec<(StandardGate, Vec<QubitId>)>> {
    let mut rewriter = Rewriter {
        properties,
        expanding: Vec::new(),
    };
    rewriter
        .rewrite(gate, qubits, 0)
        .ok_or_else(|| CompileError::UnsupportedGate {
            gate: gate.name().to_string(),
            provider: properties.provider.id.clone(),
        })
}

impl Pass for ProviderTranspilation {
    fn name(&self) -> &'static str {
        "provider_transpilation"
    }

    fn run(&self, dag: &mut CircuitDag, properties: &PropertySet) -> CompileResult<()> {
        let mut rewritten = CircuitDag::with_size(dag.num_qubits(), dag.num_clbits());
        let mut expanded = 0;
        for (_, inst) in dag.topological_ops()? {
            match inst.as_gate() {
                Some(gate) if !properties.provider.supports(gate) => {
                    for (g, qubits) in transpile_gate(*gate, &inst.qubits, properties)? {
                        rewritten.apply(Instruction::gate(g, qubits)?)?;
                    }
                    expanded += 1;
                }
                _ => {
                    rewritten.apply(inst.clone())?;
                }
            }
        }
        debug!(
            "Transpiled {} gates into the {} native set",
            expanded, properties.provider.id
        );
        *dag = rewritten;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        !properties.provider.native_gates.is_universal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::{Circuit, ClbitId, GATE_NAMES};
    use qforge_target::{GateSet, ProviderConstraints, ProviderRegistry};

    fn transpile(circuit: &Circuit, provider: ProviderConstraints) -> CompileResult<Circuit> {
        let mut dag = circuit.to_dag()?;
        ProviderTranspilation.run(&mut dag, &PropertySet::for_provider(provider))?;
        Ok(Circuit::from_dag(circuit.name(), &dag)?)
    }

    fn every_gate() -> Circuit {
        let mut c = Circuit::with_size("all", 3, 0).unwrap();
        for name in GATE_NAMES {
            let gate = [&[][..], &[0.3], &[0.3, -0.4], &[0.3, -0.4, 1.1]]
                .iter()
                .find_map(|params| StandardGate::from_name(name, params).ok())
                .unwrap();
            c.gate(gate, (0..gate.num_qubits()).map(QubitId)).unwrap();
        }
        c
    }

    #[test]
    fn test_every_gate_reaches_every_builtin_provider() {
        let circuit = every_gate();
        for profile in ProviderRegistry::builtin().profiles() {
            let out = transpile(&circuit, profile.clone()).unwrap();
            for inst in out.gates() {
                let g = inst.as_gate().unwrap();
                assert!(profile.supports(g), "{} emitted {} ", profile.id, g.name());
            }
        }
    }

    #[test]
    fn test_native_gates_untouched() {
        let mut c = Circuit::with_size("t", 2, 2).unwrap();
        c.rz(0.5, QubitId(0)).unwrap();
        c.sx(QubitId(0)).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.measure(QubitId(1), ClbitId(1)).unwrap();
        assert_eq!(transpile(&c, ProviderConstraints::ibm_quantum()).unwrap(), c);
    }

    #[test]
    fn test_cx_on_trapped_ions_goes_through_rzz() {
        let mut c = Circuit::with_size("t", 2, 0).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        let out = transpile(&c, ProviderConstraints::ionq()).unwrap();
        assert_eq!(out.count_ops().get("rzz"), Some(&1));
    }

    #[test]
    fn test_missing_decomposition_is_an_error() {
        let mut provider = ProviderConstraints::generic();
        provider.id = "cx_only".into();
        provider.native_gates = GateSet::new(["cx"]);
        let mut c = Circuit::with_size("t", 1, 0).unwrap();
        c.h(QubitId(0)).unwrap();
        let err = transpile(&c, provider).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnsupportedGate { ref gate, ref provider }
                if gate == "h" && provider == "cx_only"
        ));
    }

    #[test]
    fn test_depth_limit_applies() {
        let props = PropertySet::for_provider(ProviderConstraints::ionq()).with_max_rule_depth(1);
        // cx needs cx -> cz -> rzz, two levels of rules.
        assert!(transpile_gate(StandardGate::CX, &[QubitId(0), QubitId(1)], &props).is_err());
    }
}
