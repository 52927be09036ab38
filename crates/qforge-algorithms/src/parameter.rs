//! Template parameter declarations and values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A parameter map keyed by parameter name.
pub type Parameters = BTreeMap<String, ParameterValue>;

/// A parameter value as supplied by a caller.
///
/// Deserializes from plain JSON or YAML scalars: `true`, `3`, `0.5`, `"ring"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to floats.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Int(v) => Some(*v as f64),
            ParameterValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the value's type, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "boolean",
            ParameterValue::Int(_) => "integer",
            ParameterValue::Float(_) => "float",
            ParameterValue::Text(_) => "string",
        }
    }
}

/// Reads `true`/`false`, integers and floats; anything else is text.
impl FromStr for ParameterValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s {
            "true" => ParameterValue::Bool(true),
            "false" => ParameterValue::Bool(false),
            _ => {
                if let Ok(v) = s.parse::<i64>() {
                    ParameterValue::Int(v)
                } else if let Ok(v) = s.parse::<f64>() {
                    ParameterValue::Float(v)
                } else {
                    ParameterValue::Text(s.to_string())
                }
            }
        })
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Int(i64::from(v))
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Text(v.to_string())
    }
}

/// The type and range of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    Integer {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Float {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Choice {
        options: Vec<String>,
    },
    Boolean,
}

/// Declaration of one template parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: ParameterKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ParameterValue>,
    pub description: String,
}

impl ParameterSpec {
    fn new(name: &str, kind: ParameterKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            default: None,
            description: description.to_string(),
        }
    }

    pub fn integer(name: &str, min: Option<i64>, max: Option<i64>, description: &str) -> Self {
        Self::new(name, ParameterKind::Integer { min, max }, description)
    }

    pub fn float(name: &str, min: Option<f64>, max: Option<f64>, description: &str) -> Self {
        Self::new(name, ParameterKind::Float { min, max }, description)
    }

    pub fn choice(name: &str, options: &[&str], description: &str) -> Self {
        let options = options.iter().map(|o| (*o).to_string()).collect();
        Self::new(name, ParameterKind::Choice { options }, description)
    }

    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, ParameterKind::Boolean, description)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}
