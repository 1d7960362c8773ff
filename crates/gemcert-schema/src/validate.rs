//! # Field Validation
//!
//! Runtime validation of submitted field values against a category schema
//! version. This is the gate in front of certificate persistence: a
//! submission either conforms completely or is rejected with the full list
//! of violations.
//!
//! ## Design Decision
//!
//! Validation collects *every* violation instead of stopping at the first.
//! The caller is a person filling a certificate form; a report naming all
//! offending fields lets them fix one round trip's worth of mistakes, not
//! one mistake per round trip.
//!
//! Absence is uniform across kinds: nulls and empty or whitespace-only
//! strings count as "not submitted". A required field with an empty string
//! is missing, not invalid; an optional field with an empty string is
//! simply omitted from the validated mapping.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::schema::CategorySchema;

/// A fully validated field mapping, ready to be stored on a certificate.
///
/// Keys are field names; values are the normalized forms returned by
/// [`crate::field::FieldKind::conform`].
pub type ValidatedFields = BTreeMap<String, Value>;

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The offending field name (a declared field, or the undeclared key
    /// the submission tried to smuggle in).
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)
    }
}

/// Collection of validation violations. Never empty when returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Wrap a list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// True if some violation names the given field.
    pub fn names_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationViolations {}

/// Validate submitted values against a schema version.
///
/// Checks, in order: every required field is present (nulls and blank
/// strings are absent), every submitted key is declared in the schema
/// (extras are rejected, not dropped), and every present value conforms
/// to its declared kind. All violations are collected; on success the
/// returned mapping holds exactly the present, conformed values.
///
/// # Errors
///
/// Returns the non-empty violation list. Nothing is persisted by this
/// function either way.
pub fn validate(
    schema: &CategorySchema,
    submitted: &BTreeMap<String, Value>,
) -> Result<ValidatedFields, ValidationViolations> {
    let mut violations = Vec::new();
    let mut accepted = ValidatedFields::new();

    for def in &schema.fields {
        match submitted.get(&def.name) {
            Some(value) if is_present(value) => match def.kind.conform(value) {
                Ok(normalized) => {
                    accepted.insert(def.name.clone(), normalized);
                }
                Err(message) => violations.push(Violation {
                    field: def.name.clone(),
                    message,
                }),
            },
            _ => {
                if def.required {
                    violations.push(Violation {
                        field: def.name.clone(),
                        message: "required field is missing".to_string(),
                    });
                }
            }
        }
    }

    for name in submitted.keys() {
        if schema.field(name).is_none() {
            violations.push(Violation {
                field: name.clone(),
                message: format!(
                    "field is not declared in schema version {} for category {:?}",
                    schema.version, schema.category
                ),
            });
        }
    }

    if violations.is_empty() {
        Ok(accepted)
    } else {
        Err(ValidationViolations::new(violations))
    }
}

/// Whether a submitted value counts as present.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
