//! # Field Kinds and Definitions
//!
//! A [`FieldKind`] names the shape a submitted value must take; variants
//! carry their own validation parameters, so a schema row is fully
//! described by (name, kind, required). [`FieldKind::conform`] is the one
//! interpreter over those variants — there is no per-category validation
//! code anywhere in the system.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Calendar-date wire format accepted by [`FieldKind::Date`] fields.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The kind of value a certificate field accepts.
///
/// Serialized with an internal `type` tag, e.g.
/// `{"type": "number", "min": 0.01, "max": 10.0}` or
/// `{"type": "enum", "choices": ["FL", "IF"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, stored as submitted.
    Text,
    /// A number, optionally constrained to an inclusive range.
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// One of a fixed set of choices, matched exactly (case-sensitive).
    Enum { choices: Vec<String> },
    /// A calendar date in `YYYY-MM-DD` form.
    Date,
    /// A JSON boolean.
    Boolean,
}

impl FieldKind {
    /// The kind's wire name, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
        }
    }

    /// Check a present value against this kind and return its normalized
    /// form, or a human-readable reason why it does not conform.
    ///
    /// Normalization is minimal: numeric strings become JSON numbers and
    /// dates are re-rendered in canonical `YYYY-MM-DD` form; everything
    /// else is stored as submitted.
    pub fn conform(&self, value: &Value) -> Result<Value, String> {
        match self {
            FieldKind::Text => match value {
                Value::String(s) => Ok(Value::String(s.clone())),
                other => Err(format!("expected text, got {}", json_type_name(other))),
            },

            FieldKind::Number { min, max } => {
                let (parsed, normalized) = match value {
                    Value::Number(n) => (n.as_f64(), Some(value.clone())),
                    Value::String(s) => (s.trim().parse::<f64>().ok(), None),
                    _ => (None, None),
                };
                let n = match parsed.filter(|n| n.is_finite()) {
                    Some(n) => n,
                    None => {
                        return Err(format!(
                            "expected a number, got {}",
                            json_type_name(value)
                        ))
                    }
                };
                if let Some(lo) = min {
                    if n < *lo {
                        return Err(format!("value {n} is below the minimum {lo}"));
                    }
                }
                if let Some(hi) = max {
                    if n > *hi {
                        return Err(format!("value {n} is above the maximum {hi}"));
                    }
                }
                match normalized {
                    Some(original) => Ok(original),
                    None => serde_json::Number::from_f64(n)
                        .map(Value::Number)
                        .ok_or_else(|| "expected a finite number".to_string()),
                }
            }

            FieldKind::Enum { choices } => match value {
                Value::String(s) if choices.iter().any(|c| c == s) => {
                    Ok(Value::String(s.clone()))
                }
                Value::String(s) => Err(format!(
                    "{s:?} is not one of the declared choices [{}]",
                    choices.join(", ")
                )),
                other => Err(format!(
                    "expected one of the declared choices, got {}",
                    json_type_name(other)
                )),
            },

            FieldKind::Date => match value {
                Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                    .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
                    .map_err(|_| {
                        format!("{s:?} is not a calendar date (expected YYYY-MM-DD)")
                    }),
                other => Err(format!(
                    "expected a calendar date, got {}",
                    json_type_name(other)
                )),
            },

            FieldKind::Boolean => match value {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(format!("expected a boolean, got {}", json_type_name(other))),
            },
        }
    }
}

/// A single field row in a category schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldDef {
    /// Field name, unique within its schema; the key submissions use.
    pub name: String,
    /// Optional display label; never consulted by validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// What values this field accepts.
    pub kind: FieldKind,
    /// Whether a submission must carry a non-empty value for this field.
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    /// A required field definition.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: true,
        }
    }

    /// An optional field definition.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: false,
        }
    }
}

/// JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
