//! # gemcert-schema — Data-Defined Certificate Schemas
//!
//! Certificate content is not statically typed. Which fields a certificate
//! carries, and what values those fields accept, is data: each certificate
//! category stores a versioned list of field definitions, and submitted
//! values are checked against that list at runtime.
//!
//! This crate holds the whole of that mechanism:
//!
//! - [`FieldKind`] — the tagged field-kind enumeration; each variant carries
//!   its own validation parameters (numeric range, enum choices).
//! - [`FieldDef`] / [`CategorySchema`] — the ordered field list for one
//!   version of one category, with the definition-level checks applied at
//!   registration time.
//! - [`validate`] — the single generic interpreter that checks a submitted
//!   value map against a schema and reports *every* violation, not just the
//!   first.
//!
//! ## Design Decision
//!
//! Validation never mutates or persists anything. It either returns a fully
//! conformed field mapping or a non-empty violation list; callers persist
//! the mapping only on success, so a rejected submission leaves no trace.
//!
//! ## Crate Policy
//!
//! - Depends only on `gemcert-core` internally.
//! - No `unsafe` code, no `panic!()` or `.unwrap()` outside tests.

pub mod field;
pub mod schema;
pub mod validate;

pub use field::{FieldDef, FieldKind};
pub use schema::{CategorySchema, SchemaError};
pub use validate::{validate, ValidatedFields, ValidationViolations, Violation};
