//! # Schema Subcommand
//!
//! Checks category schema definition files for defects: blank names,
//! duplicate fields, enum fields without choices. The same checks run
//! when a schema is registered through the API; running them offline
//! catches mistakes before a file is ever submitted.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Deserialize;

use gemcert_core::Timestamp;
use gemcert_schema::{CategorySchema, FieldDef};

/// A schema definition file: the category name and its field definitions.
#[derive(Debug, Deserialize)]
pub struct SchemaFile {
    /// The item category the schema describes.
    pub category: String,
    /// The field definitions making up the schema.
    pub fields: Vec<FieldDef>,
}

/// Arguments for the `gemcert schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema definition files to check (JSON or YAML).
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,
}

/// Execute the schema subcommand.
///
/// Returns exit code 0 when every file passes, 1 when any file fails its
/// check. Unreadable and unparseable files count as failed checks.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let total = args.paths.len();
    let mut passed = 0usize;

    for path in &args.paths {
        match check_schema_file(path) {
            Ok(summary) => {
                println!("OK: {} — {summary}", path.display());
                passed += 1;
            }
            Err(message) => {
                println!("FAIL: {} — {message}", path.display());
            }
        }
    }

    println!("Schemas: {passed}/{total} passed");

    if passed == total {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Check one schema definition file.
///
/// Returns a one-line summary on success, or the failure message. Any
/// problem with the file (read, parse, or a definition defect) is a
/// failure.
fn check_schema_file(path: &Path) -> std::result::Result<String, String> {
    let file: SchemaFile = crate::load_document(path).map_err(|e| format!("{e:#}"))?;

    let field_count = file.fields.len();
    // The version number is irrelevant to definition checking; 1 stands
    // in for whatever the registry would assign.
    let schema = CategorySchema::new(&file.category, 1, file.fields, Timestamp::now())
        .map_err(|e| e.to_string())?;

    let required = schema.fields.iter().filter(|f| f.required).count();
    Ok(format!(
        "category {:?}, {field_count} field(s), {required} required",
        schema.category
    ))
}
