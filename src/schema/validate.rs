use super::types::Schema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted/indexed location of the offending value, empty for the root.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every violation found while applying a schema. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn fits_i64(f: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn mismatch(path: &str, expected: &Schema, got: &Value) -> ValidationIssue {
    ValidationIssue::new(
        path,
        format!(
            "Expected {}, received {}",
            expected.type_name(),
            json_type(got)
        ),
    )
}

impl Schema {
    /// Validate a loosely typed value.
    ///
    /// Returns the cleaned value (unknown object keys stripped) or every
    /// violation found. Validation does not stop at the first issue.
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        let cleaned = self.check(value, "", &mut issues);
        if issues.is_empty() {
            Ok(cleaned)
        } else {
            Err(ValidationError { issues })
        }
    }

    fn check(&self, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) -> Value {
        match (self, value) {
            (Schema::Empty, _) => Value::Object(Map::new()),
            (Schema::String, Value::String(_)) | (Schema::Boolean, Value::Bool(_)) => {
                value.clone()
            }
            (Schema::Number, Value::Number(_)) => value.clone(),
            (Schema::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => value.clone(),
            (Schema::Integer, Value::Number(n)) => match n.as_f64() {
                // `3.0` and `1e2` come back as JSON integers so typed inputs deserialize.
                Some(f) if f.fract() == 0.0 && fits_i64(f) => Value::from(f as i64),
                Some(f) if f.fract() == 0.0 && f.is_finite() => {
                    issues.push(ValidationIssue::new(path, "Integer out of range"));
                    value.clone()
                }
                _ => {
                    issues.push(ValidationIssue::new(
                        path,
                        "Expected integer, received float",
                    ));
                    value.clone()
                }
            },
            (Schema::Array(items), Value::Array(values)) => Value::Array(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| items.check(v, &format!("{path}[{i}]"), issues))
                    .collect(),
            ),
            (Schema::Object(fields), Value::Object(map)) => {
                let mut out = Map::new();
                for field in fields {
                    let field_path = join(path, &field.name);
                    match map.get(&field.name) {
                        None | Some(Value::Null) if field.required => {
                            issues.push(ValidationIssue::new(field_path, "Required"));
                        }
                        None | Some(Value::Null) => {}
                        Some(v) => {
                            let checked = field.schema.check(v, &field_path, issues);
                            out.insert(field.name.clone(), checked);
                        }
                    }
                }
                Value::Object(out)
            }
            (expected, got) => {
                issues.push(mismatch(path, expected, got));
                Value::Null
            }
        }
    }
}
