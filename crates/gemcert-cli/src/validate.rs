//! # Validate Subcommand
//!
//! Validates a field document against a schema definition file, exactly
//! as the API would at issuance time: required fields present, no
//! undeclared keys, every value conforming to its declared kind. All
//! violations are reported in one pass.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use gemcert_core::Timestamp;
use gemcert_schema::{validate, CategorySchema};

use crate::schema::SchemaFile;

/// Arguments for the `gemcert validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema definition file to validate against (JSON or YAML).
    #[arg(long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Field document to validate: a mapping of field name to value.
    #[arg(value_name = "FIELDS")]
    pub fields: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code 0 when the document conforms and 1 when it has
/// violations. Unreadable or malformed input files propagate as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let file: SchemaFile = crate::load_document(&args.schema)?;
    let schema = CategorySchema::new(&file.category, 1, file.fields, Timestamp::now())
        .with_context(|| format!("defective schema in {}", args.schema.display()))?;

    let submitted: BTreeMap<String, Value> = crate::load_document(&args.fields)?;

    match validate(&schema, &submitted) {
        Ok(accepted) => {
            println!(
                "OK: {} conforms to category {:?} ({} field(s) accepted)",
                args.fields.display(),
                schema.category,
                accepted.len()
            );
            Ok(0)
        }
        Err(violations) => {
            println!(
                "FAIL: {} does not conform to category {:?}:",
                args.fields.display(),
                schema.category
            );
            for violation in violations.violations() {
                println!("{violation}");
            }
            println!("{} violation(s).", violations.len());
            Ok(1)
        }
    }
}
