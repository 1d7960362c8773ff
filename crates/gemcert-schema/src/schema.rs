//! # Category Schemas
//!
//! One [`CategorySchema`] is one immutable version of one certificate
//! category's field list. Registration always creates a new version and
//! never touches an existing one, because issued certificates reference
//! the schema version they were validated against and must remain
//! checkable against exactly that version.
//!
//! Definition-level validation happens here, at construction: a schema
//! that would be impossible to satisfy (duplicate field names, an enum
//! with no choices, an empty numeric range) is rejected before any
//! version is created.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use gemcert_core::Timestamp;

use crate::field::{FieldDef, FieldKind};

/// Errors raised when constructing a category schema from field definitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("category name must not be empty")]
    EmptyCategory,

    #[error("schema for category {category:?} declares no fields")]
    NoFields { category: String },

    #[error("schema versions start at 1")]
    InvalidVersion,

    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("duplicate field name {name:?} in schema")]
    DuplicateField { name: String },

    #[error("enum field {field:?} declares no choices")]
    NoChoices { field: String },

    #[error("enum field {field:?} repeats the choice {choice:?}")]
    DuplicateChoice { field: String, choice: String },

    #[error("number field {field:?} has an empty range: min {min} exceeds max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },
}

/// One version of one certificate category's field definitions.
///
/// Instances are immutable once constructed; the registry appends new
/// versions and never rewrites old ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySchema {
    /// The certificate category this schema governs, e.g. `single-diamond`.
    pub category: String,
    /// Version number, starting at 1 per category.
    pub version: u32,
    /// Ordered field definitions; names unique within the schema.
    pub fields: Vec<FieldDef>,
    /// When this version was registered.
    #[schema(value_type = String, example = "2025-01-23T12:00:00Z")]
    pub registered_at: Timestamp,
}

impl CategorySchema {
    /// Build a schema version, validating the definitions themselves.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] naming the first defect found in the
    /// definitions. Unlike value validation, definition checking stops at
    /// the first problem: a bad definition is an administrative mistake to
    /// fix, not a form to correct field by field.
    pub fn new(
        category: impl Into<String>,
        version: u32,
        fields: Vec<FieldDef>,
        registered_at: Timestamp,
    ) -> Result<Self, SchemaError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(SchemaError::EmptyCategory);
        }
        if version == 0 {
            return Err(SchemaError::InvalidVersion);
        }
        if fields.is_empty() {
            return Err(SchemaError::NoFields { category });
        }

        let mut seen = HashSet::new();
        for def in &fields {
            if def.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(def.name.clone()) {
                return Err(SchemaError::DuplicateField {
                    name: def.name.clone(),
                });
            }
            match &def.kind {
                FieldKind::Enum { choices } => {
                    if choices.is_empty() {
                        return Err(SchemaError::NoChoices {
                            field: def.name.clone(),
                        });
                    }
                    let mut choice_seen = HashSet::new();
                    for choice in choices {
                        if !choice_seen.insert(choice.clone()) {
                            return Err(SchemaError::DuplicateChoice {
                                field: def.name.clone(),
                                choice: choice.clone(),
                            });
                        }
                    }
                }
                FieldKind::Number {
                    min: Some(min),
                    max: Some(max),
                } if min > max => {
                    return Err(SchemaError::InvalidRange {
                        field: def.name.clone(),
                        min: *min,
                        max: *max,
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            category,
            version,
            fields,
            registered_at,
        })
    }

    /// Look up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// Names of all declared fields, in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|def| def.name.as_str()).collect()
    }
}
