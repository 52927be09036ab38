//! Parameter validation.
//!
//! Validation never stops at the first problem: every missing, mistyped,
//! out-of-range or unknown parameter yields its own [`ValidationError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parameter::{ParameterKind, ParameterSpec, ParameterValue, Parameters};

/// What kind of constraint a parameter broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    Missing,
    WrongType,
    BelowMinimum,
    AboveMaximum,
    NotAnOption,
    UnknownParameter,
    /// A rule spanning several parameters.
    Constraint,
}

/// One broken constraint.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(field: &str, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }
}

/// Outcome of validating a parameter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors reported against one field.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.field == field)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("valid");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Check `params` against the declared specs.
pub fn validate(specs: &[ParameterSpec], params: &Parameters) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for spec in specs {
        match params.get(&spec.name) {
            Some(value) => check_value(spec, value, &mut errors),
            None if spec.required => errors.push(ValidationError::new(
                &spec.name,
                ValidationErrorKind::Missing,
                "is required",
            )),
            None => {}
        }
    }
    for name in params.keys() {
        if !specs.iter().any(|s| &s.name == name) {
            errors.push(ValidationError::new(
                name,
                ValidationErrorKind::UnknownParameter,
                "is not a parameter of this template",
            ));
        }
    }
    errors
}

fn wrong_type(spec: &ParameterSpec, expected: &str, value: &ParameterValue) -> ValidationError {
    ValidationError::new(
        &spec.name,
        ValidationErrorKind::WrongType,
        format!("expected {expected}, got {} '{value}'", value.type_name()),
    )
}

fn check_range<T: PartialOrd + fmt::Display>(
    spec: &ParameterSpec,
    value: T,
    min: Option<T>,
    max: Option<T>,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(min) = min.filter(|m| value < *m) {
        errors.push(ValidationError::new(
            &spec.name,
            ValidationErrorKind::BelowMinimum,
            format!("must be at least {min}, got {value}"),
        ));
    }
    if let Some(max) = max.filter(|m| value > *m) {
        errors.push(ValidationError::new(
            &spec.name,
            ValidationErrorKind::AboveMaximum,
            format!("must be at most {max}, got {value}"),
        ));
    }
}

fn check_value(spec: &ParameterSpec, value: &ParameterValue, errors: &mut Vec<ValidationError>) {
    match &spec.kind {
        ParameterKind::Integer { min, max } => match value.as_i64() {
            Some(v) => check_range(spec, v, *min, *max, errors),
            None => errors.push(wrong_type(spec, "integer", value)),
        },
        ParameterKind::Float { min, max } => match value.as_f64() {
            Some(v) if v.is_finite() => check_range(spec, v, *min, *max, errors),
            Some(v) => errors.push(ValidationError::new(
                &spec.name,
                ValidationErrorKind::WrongType,
                format!("must be a finite number, got {v}"),
            )),
            None => errors.push(wrong_type(spec, "number", value)),
        },
        ParameterKind::Choice { options } => match value.as_str() {
            Some(v) if options.iter().any(|o| o == v) => {}
            Some(v) => errors.push(ValidationError::new(
                &spec.name,
                ValidationErrorKind::NotAnOption,
                format!("'{v}' is not one of: {}", options.join(", ")),
            )),
            None => errors.push(wrong_type(spec, "string", value)),
        },
        ParameterKind::Boolean => {
            if value.as_bool().is_none() {
                errors.push(wrong_type(spec, "boolean", value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::integer("layers", Some(1), Some(10), "").required(),
            ParameterSpec::float("beta", Some(0.0), Some(1.0), "").with_default(0.5),
            ParameterSpec::choice("mode", &["linear", "full"], "").with_default("linear"),
            ParameterSpec::boolean("measure", "").with_default(true),
        ]
    }

    fn params(pairs: &[(&str, ParameterValue)]) -> Parameters {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    #[test]
    fn test_valid_map() {
        let errors = validate(&specs(), &params(&[("layers", 3.into()), ("beta", 1.into())]));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_reports_every_violation() {
        let p = params(&[
            ("beta", 1.5.into()),
            ("mode", "ring".into()),
            ("measure", 1.into()),
            ("depth", 2.into()),
        ]);
        let report = ValidationReport::from_errors(validate(&specs(), &p));
        assert!(!report.valid);
        let kinds: Vec<_> = report.errors.iter().map(|e| (e.field.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("layers", ValidationErrorKind::Missing),
                ("beta", ValidationErrorKind::AboveMaximum),
                ("mode", ValidationErrorKind::NotAnOption),
                ("measure", ValidationErrorKind::WrongType),
                ("depth", ValidationErrorKind::UnknownParameter),
            ]
        );
    }

    #[test]
    fn test_below_minimum_message() {
        let errors = validate(&specs(), &params(&[("layers", (-5).into())]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::BelowMinimum);
        assert_eq!(errors[0].to_string(), "layers: must be at least 1, got -5");
    }

    #[test]
    fn test_float_is_not_an_integer() {
        let errors = validate(&specs(), &params(&[("layers", 2.5.into())]));
        assert_eq!(errors[0].kind, ValidationErrorKind::WrongType);
    }

    #[test]
    fn test_report_display() {
        let report = ValidationReport::from_errors(vec![
            ValidationError::new("a", ValidationErrorKind::Missing, "is required"),
            ValidationError::new("b", ValidationErrorKind::Constraint, "too big"),
        ]);
        assert_eq!(report.to_string(), "a: is required; b: too big");
        assert_eq!(report.errors_for("b").count(), 1);
    }
}
