//! # gemcert-cli — CLI Tool for GemCert
//!
//! Provides the `gemcert` command-line interface for working with category
//! schema files offline, without a running API server.
//!
//! ## Subcommands
//!
//! - `gemcert schema` — Check schema definition files for defects.
//! - `gemcert validate` — Validate a field document against a schema file.
//!
//! Both subcommands accept JSON or YAML input, chosen by file extension:
//!
//! ```bash
//! gemcert schema schemas/diamond.yaml schemas/ruby.json
//! gemcert validate --schema schemas/diamond.yaml submission.yaml
//! ```

pub mod schema;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and deserialize a JSON or YAML document.
///
/// The format is chosen by extension: `.json` parses as JSON, everything
/// else as YAML. YAML is a superset of JSON, so an extensionless JSON
/// file still parses.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))
    }
}
