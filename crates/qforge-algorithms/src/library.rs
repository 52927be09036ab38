//! The built-in template catalogue.

use std::f64::consts::PI;

use qforge_ir::Circuit;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, instrument};

use crate::circuits::{
    BellVariant, Entanglement, GraphKind, bell_state, ghz_state, grover, qaoa_maxcut, qft,
    qpe, vqe_ansatz,
};
use crate::error::{AlgorithmError, AlgorithmResult};
use crate::parameter::{ParameterSpec, ParameterValue, Parameters};
use crate::template::{AlgorithmTemplate, Category, Difficulty};
use crate::validation::{ValidationError, ValidationErrorKind, ValidationReport};

/// Templates addressable by id.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<AlgorithmTemplate>,
}

impl TemplateLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Library holding every built-in template.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        for template in [
            bell_template(),
            ghz_template(),
            vqe_template(),
            qaoa_template(),
            qpe_template(),
            qft_template(),
            grover_template(),
        ] {
            library.register(template);
        }
        library
    }

    /// Add a template, replacing any with the same id.
    pub fn register(&mut self, template: AlgorithmTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, id: &str) -> AlgorithmResult<&AlgorithmTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AlgorithmError::UnknownTemplate(id.to_string()))
    }

    /// Templates in registration order.
    pub fn templates(&self) -> &[AlgorithmTemplate] {
        &self.templates
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.id.as_str())
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &AlgorithmTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Check a parameter map against a template, reporting every violation.
    pub fn validate_parameters(
        &self,
        id: &str,
        params: &Parameters,
    ) -> AlgorithmResult<ValidationReport> {
        Ok(self.get(id)?.validate(params))
    }

    /// Validate `params`, fill defaults and build the template's circuit.
    #[instrument(skip(self, params))]
    pub fn generate_circuit(&self, id: &str, params: &Parameters) -> AlgorithmResult<Circuit> {
        let template = self.get(id)?;
        let circuit = template.generate(params)?;
        debug!(
            "Generated {} with {} qubits and {} gates",
            id,
            circuit.num_qubits(),
            circuit.gate_count()
        );
        Ok(circuit)
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn measure_flag() -> ParameterSpec {
    ParameterSpec::boolean("measure", "Measure every qubit at the end").with_default(true)
}

fn bell_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "bell_state",
        "Bell State",
        Category::Entanglement,
        Difficulty::Beginner,
        "Maximally entangled pair of qubits.",
        |args| {
            let variant: BellVariant = args.choice("variant")?;
            Ok(bell_state(variant, args.flag("measure")?)?)
        },
    )
    .with_parameter(
        ParameterSpec::choice("variant", &BellVariant::NAMES, "Which of the four Bell states")
            .with_default("phi_plus"),
    )
    .with_parameter(measure_flag())
}

fn ghz_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "ghz_state",
        "GHZ State",
        Category::Entanglement,
        Difficulty::Beginner,
        "Equal superposition of all-zeros and all-ones across n qubits.",
        |args| Ok(ghz_state(args.count("num_qubits")?, args.flag("measure")?)?),
    )
    .with_parameter(
        ParameterSpec::integer("num_qubits", Some(2), Some(32), "Number of qubits").with_default(3),
    )
    .with_parameter(measure_flag())
}

fn vqe_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "vqe_standard",
        "Variational Quantum Eigensolver",
        Category::Variational,
        Difficulty::Intermediate,
        "Hardware-efficient RY/RZ ansatz with CX entangling layers and seeded initial angles.",
        |args| {
            let seed = args.int("seed")?;
            let mut rng = SmallRng::seed_from_u64(seed.unsigned_abs());
            Ok(vqe_ansatz(
                args.count("num_qubits")?,
                args.count("layers")?,
                args.choice::<Entanglement>("entanglement")?,
                args.flag("measure")?,
                &mut rng,
            )?)
        },
    )
    .with_parameter(
        ParameterSpec::integer("num_qubits", Some(2), Some(16), "Number of qubits").with_default(4),
    )
    .with_parameter(
        ParameterSpec::integer("layers", Some(1), Some(10), "Rotation and entangling layers")
            .with_default(2),
    )
    .with_parameter(
        ParameterSpec::choice("entanglement", &Entanglement::NAMES, "CX connectivity per layer")
            .with_default("linear"),
    )
    .with_parameter(
        ParameterSpec::integer("seed", Some(0), None, "Seed for the initial angles")
            .with_default(42),
    )
    .with_parameter(measure_flag())
}

fn qaoa_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "qaoa_maxcut",
        "QAOA Max-Cut",
        Category::Optimization,
        Difficulty::Intermediate,
        "Alternating ZZ cost and X mixer layers for Max-Cut on a built-in graph.",
        |args| {
            Ok(qaoa_maxcut(
                args.count("num_nodes")?,
                args.choice::<GraphKind>("graph")?,
                args.count("layers")?,
                args.float("gamma")?,
                args.float("beta")?,
                args.flag("measure")?,
            )?)
        },
    )
    .with_parameter(
        ParameterSpec::integer("num_nodes", Some(2), Some(20), "Graph nodes, one qubit each")
            .with_default(4),
    )
    .with_parameter(
        ParameterSpec::choice("graph", &GraphKind::NAMES, "Problem graph").with_default("ring"),
    )
    .with_parameter(
        ParameterSpec::integer("layers", Some(1), Some(10), "QAOA depth p").with_default(1),
    )
    .with_parameter(
        ParameterSpec::float("gamma", Some(0.0), Some(2.0 * PI), "Cost angle").with_default(0.8),
    )
    .with_parameter(
        ParameterSpec::float("beta", Some(0.0), Some(PI), "Mixer angle").with_default(0.4),
    )
    .with_parameter(measure_flag())
    .with_cross_check(|args| {
        let nodes = args.get("num_nodes").and_then(ParameterValue::as_i64);
        let graph = args
            .get("graph")
            .and_then(ParameterValue::as_str)
            .and_then(|g| g.parse::<GraphKind>().ok());
        match (nodes, graph) {
            (Some(n), Some(graph)) if n < i64::from(graph.min_nodes()) => {
                vec![ValidationError::new(
                    "num_nodes",
                    ValidationErrorKind::Constraint,
                    format!("a {graph} graph needs at least {} nodes", graph.min_nodes()),
                )]
            }
            _ => vec![],
        }
    })
}

fn qpe_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "qpe",
        "Quantum Phase Estimation",
        Category::PhaseEstimation,
        Difficulty::Advanced,
        "Reads the eigenphase of a phase gate into a counting register via the inverse QFT.",
        |args| Ok(qpe(args.count("precision_qubits")?, args.float("phase")?)?),
    )
    .with_parameter(
        ParameterSpec::integer("precision_qubits", Some(1), Some(12), "Counting register size")
            .with_default(3),
    )
    .with_parameter(
        ParameterSpec::float("phase", Some(0.0), Some(1.0), "Eigenphase as a fraction of a turn")
            .with_default(0.25),
    )
}

fn qft_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "qft",
        "Quantum Fourier Transform",
        Category::Transform,
        Difficulty::Intermediate,
        "Discrete Fourier transform over the amplitudes of an n-qubit register.",
        |args| {
            Ok(qft(
                args.count("num_qubits")?,
                args.flag("inverse")?,
                args.flag("swaps")?,
                args.flag("measure")?,
            )?)
        },
    )
    .with_parameter(
        ParameterSpec::integer("num_qubits", Some(1), Some(16), "Register size").with_default(3),
    )
    .with_parameter(
        ParameterSpec::boolean("inverse", "Build the inverse transform").with_default(false),
    )
    .with_parameter(
        ParameterSpec::boolean("swaps", "Reverse qubit order at the end").with_default(true),
    )
    .with_parameter(
        ParameterSpec::boolean("measure", "Measure every qubit at the end").with_default(false),
    )
}

fn grover_template() -> AlgorithmTemplate {
    AlgorithmTemplate::new(
        "grover",
        "Grover Search",
        Category::Search,
        Difficulty::Advanced,
        "Amplitude amplification of one marked basis state.",
        |args| {
            let marked = args.count("marked_state")?;
            Ok(grover(
                args.count("num_qubits")?,
                u64::from(marked),
                args.optional_count("iterations")?,
            )?)
        },
    )
    .with_parameter(
        ParameterSpec::integer("num_qubits", Some(2), Some(8), "Search register size")
            .with_default(3),
    )
    .with_parameter(
        ParameterSpec::integer(
            "marked_state",
            Some(0),
            None,
            "Basis state to find, bit i is qubit i",
        )
        .required(),
    )
    .with_parameter(ParameterSpec::integer(
        "iterations",
        Some(1),
        Some(100),
        "Grover iterations, optimal when omitted",
    ))
    .with_cross_check(|args| {
        let qubits = args.get("num_qubits").and_then(ParameterValue::as_i64);
        let marked = args.get("marked_state").and_then(ParameterValue::as_i64);
        match (qubits, marked) {
            (Some(n @ 0..=62), Some(m)) if m >= 1_i64 << n => vec![ValidationError::new(
                "marked_state",
                ValidationErrorKind::Constraint,
                format!("must be below 2^{n} = {} for {n} qubits", 1_i64 << n),
            )],
            _ => vec![],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, ParameterValue)]) -> Parameters {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    #[test]
    fn test_builtin_ids() {
        let library = TemplateLibrary::builtin();
        let ids: Vec<_> = library.ids().collect();
        assert_eq!(
            ids,
            ["bell_state", "ghz_state", "vqe_standard", "qaoa_maxcut", "qpe", "qft", "grover"]
        );
    }

    #[test]
    fn test_unknown_template() {
        let library = TemplateLibrary::builtin();
        assert!(matches!(
            library.validate_parameters("shor", &Parameters::new()),
            Err(AlgorithmError::UnknownTemplate(ref id)) if id == "shor"
        ));
        assert!(library.generate_circuit("shor", &Parameters::new()).is_err());
    }

    #[test]
    fn test_vqe_negative_layers() {
        let library = TemplateLibrary::builtin();
        let report = library
            .validate_parameters("vqe_standard", &params(&[("layers", (-5).into())]))
            .unwrap();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "layers");
        assert_eq!(report.errors[0].kind, ValidationErrorKind::BelowMinimum);
    }

    #[test]
    fn test_all_errors_returned() {
        let library = TemplateLibrary::builtin();
        let report = library
            .validate_parameters(
                "vqe_standard",
                &params(&[
                    ("layers", 0.into()),
                    ("num_qubits", 40.into()),
                    ("entanglement", "star".into()),
                    ("shots", 10.into()),
                ]),
            )
            .unwrap();
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["num_qubits", "layers", "entanglement", "shots"]);
    }

    #[test]
    fn test_every_template_generates_with_defaults() {
        let library = TemplateLibrary::builtin();
        for template in library.templates() {
            let mut p = Parameters::new();
            if template.id == "grover" {
                p.insert("marked_state".into(), 5.into());
            }
            let circuit = library.generate_circuit(&template.id, &p).unwrap();
            assert!(circuit.gate_count() > 0, "{}", template.id);
        }
    }

    #[test]
    fn test_grover_marked_state_must_fit() {
        let library = TemplateLibrary::builtin();
        let p = params(&[("num_qubits", 3.into()), ("marked_state", 8.into())]);
        let report = library.validate_parameters("grover", &p).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationErrorKind::Constraint);

        let report = library.validate_parameters("grover", &Parameters::new()).unwrap();
        assert_eq!(report.errors[0].kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn test_qaoa_ring_needs_three_nodes() {
        let library = TemplateLibrary::builtin();
        let report = library
            .validate_parameters("qaoa_maxcut", &params(&[("num_nodes", 2.into())]))
            .unwrap();
        assert!(!report.valid);
        let line = params(&[("num_nodes", 2.into()), ("graph", "line".into())]);
        assert!(library.validate_parameters("qaoa_maxcut", &line).unwrap().valid);
    }

    #[test]
    fn test_vqe_seed_controls_angles() {
        let library = TemplateLibrary::builtin();
        let a = library.generate_circuit("vqe_standard", &params(&[("seed", 1.into())])).unwrap();
        let b = library.generate_circuit("vqe_standard", &params(&[("seed", 1.into())])).unwrap();
        let c = library.generate_circuit("vqe_standard", &params(&[("seed", 2.into())])).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_register_replaces() {
        let mut library = TemplateLibrary::builtin();
        let count = library.templates().len();
        library.register(ghz_template());
        assert_eq!(library.templates().len(), count);
        assert_eq!(library.by_category(Category::Entanglement).count(), 2);
    }
}
