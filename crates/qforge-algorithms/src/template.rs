//! Template declarations and resolved arguments.

use std::fmt;
use std::str::FromStr;

use qforge_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::{AlgorithmError, AlgorithmResult};
use crate::parameter::{ParameterSpec, ParameterValue, Parameters};
use crate::validation::{ValidationError, ValidationErrorKind, ValidationReport, validate};

/// Builds a circuit from validated arguments.
pub type Generator = fn(&Arguments) -> AlgorithmResult<Circuit>;

/// Checks rules that span several parameters.
pub type CrossCheck = fn(&Arguments) -> Vec<ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Entanglement,
    Variational,
    Optimization,
    PhaseEstimation,
    Transform,
    Search,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Entanglement => "entanglement",
            Category::Variational => "variational",
            Category::Optimization => "optimization",
            Category::PhaseEstimation => "phase_estimation",
            Category::Transform => "transform",
            Category::Search => "search",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

/// A parameterized circuit generator with its declared parameters.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmTemplate {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    #[serde(skip)]
    generator: Generator,
    #[serde(skip)]
    cross_check: Option<CrossCheck>,
}

impl AlgorithmTemplate {
    pub fn new(
        id: &str,
        name: &str,
        category: Category,
        difficulty: Difficulty,
        description: &str,
        generator: Generator,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            difficulty,
            description: description.to_string(),
            parameters: Vec::new(),
            generator,
            cross_check: None,
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    #[must_use]
    pub fn with_cross_check(mut self, check: CrossCheck) -> Self {
        self.cross_check = Some(check);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Validate `params`, collecting every violation.
    pub fn validate(&self, params: &Parameters) -> ValidationReport {
        let mut errors = validate(&self.parameters, params);
        if let Some(check) = self.cross_check {
            errors.extend(check(&self.resolve(params)));
        }
        ValidationReport::from_errors(errors)
    }

    /// Supplied parameters with declared defaults filled in.
    pub fn resolve(&self, params: &Parameters) -> Arguments {
        let mut values = params.clone();
        for spec in &self.parameters {
            if let Some(default) = &spec.default {
                values
                    .entry(spec.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        Arguments { values }
    }

    /// Validate, fill defaults and build the circuit.
    pub fn generate(&self, params: &Parameters) -> AlgorithmResult<Circuit> {
        let report = self.validate(params);
        if !report.valid {
            return Err(AlgorithmError::Validation(report));
        }
        (self.generator)(&self.resolve(params))
    }
}

/// Parameter values after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    values: Parameters,
}

fn invalid(name: &str, kind: ValidationErrorKind, message: impl Into<String>) -> AlgorithmError {
    AlgorithmError::Validation(ValidationReport::from_errors(vec![ValidationError::new(
        name, kind, message,
    )]))
}

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> AlgorithmResult<&ParameterValue> {
        self.get(name)
            .ok_or_else(|| invalid(name, ValidationErrorKind::Missing, "is required"))
    }

    pub fn int(&self, name: &str) -> AlgorithmResult<i64> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| invalid(name, ValidationErrorKind::WrongType, "expected integer"))
    }

    /// A non-negative integer that fits in `u32`.
    pub fn count(&self, name: &str) -> AlgorithmResult<u32> {
        let value = self.int(name)?;
        u32::try_from(value).map_err(|_| {
            invalid(
                name,
                ValidationErrorKind::BelowMinimum,
                format!("{value} is not a valid count"),
            )
        })
    }

    pub fn optional_count(&self, name: &str) -> AlgorithmResult<Option<u32>> {
        match self.get(name) {
            Some(_) => self.count(name).map(Some),
            None => Ok(None),
        }
    }

    pub fn float(&self, name: &str) -> AlgorithmResult<f64> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| invalid(name, ValidationErrorKind::WrongType, "expected number"))
    }

    pub fn flag(&self, name: &str) -> AlgorithmResult<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| invalid(name, ValidationErrorKind::WrongType, "expected boolean"))
    }

    /// A choice parameter parsed into its enum.
    pub fn choice<T: FromStr<Err = String>>(&self, name: &str) -> AlgorithmResult<T> {
        let text = self
            .require(name)?
            .as_str()
            .ok_or_else(|| invalid(name, ValidationErrorKind::WrongType, "expected string"))?;
        text.parse()
            .map_err(|e: String| invalid(name, ValidationErrorKind::NotAnOption, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::QubitId;

    fn line(args: &Arguments) -> AlgorithmResult<Circuit> {
        let n = args.count("n")?;
        let mut c = Circuit::with_size("line", n, 0)?;
        for q in 1..n {
            c.cx(QubitId(q - 1), QubitId(q))?;
        }
        Ok(c)
    }

    fn at_most_n_minus_one(args: &Arguments) -> Vec<ValidationError> {
        let n = args.get("n").and_then(ParameterValue::as_i64);
        let k = args.get("k").and_then(ParameterValue::as_i64);
        match (n, k) {
            (Some(n), Some(k)) if k >= n => vec![ValidationError::new(
                "k",
                ValidationErrorKind::Constraint,
                "must be below n",
            )],
            _ => vec![],
        }
    }

    fn template() -> AlgorithmTemplate {
        AlgorithmTemplate::new(
            "line",
            "Line",
            Category::Entanglement,
            Difficulty::Beginner,
            "",
            line,
        )
        .with_parameter(ParameterSpec::integer("n", Some(2), Some(8), "").with_default(3))
        .with_parameter(ParameterSpec::integer("k", Some(0), None, ""))
        .with_cross_check(at_most_n_minus_one)
    }

    #[test]
    fn test_defaults_fill_in() {
        let c = template().generate(&Parameters::new()).unwrap();
        assert_eq!(c.num_qubits(), 3);
    }

    #[test]
    fn test_cross_check_joins_field_errors() {
        let params: Parameters =
            [("n".to_string(), 20.into()), ("k".to_string(), 25.into())].into();
        let report = template().validate(&params);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[1].kind, ValidationErrorKind::Constraint);
    }

    #[test]
    fn test_invalid_generation_returns_report() {
        let params: Parameters = [("n".to_string(), "wide".into())].into();
        let Err(AlgorithmError::Validation(report)) = template().generate(&params) else {
            panic!("expected a validation error");
        };
        assert_eq!(report.errors[0].field, "n");
    }

    #[test]
    fn test_template_serializes_without_generator() {
        let json = serde_json::to_value(template()).unwrap();
        assert_eq!(json["category"], "entanglement");
        assert_eq!(json["parameters"].as_array().unwrap().len(), 2);
        assert!(json.get("generator").is_none());
    }
}
