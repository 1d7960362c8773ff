//! # Issued Certificates
//!
//! An immutable snapshot of a certification outcome. A certificate is
//! created exactly once, after its fields passed schema validation and a
//! certificate number was allocated, and is never edited afterwards. The
//! schema version it was validated against is pinned on the record so the
//! certificate stays interpretable after the category schema evolves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use gemcert_core::{CertificateId, ClientId, JobId, Timestamp};

/// An issued certificate.
///
/// `fields` holds the validated attribute values in normalized form, keyed
/// by field name. Ordering is stable (BTreeMap) so serialized certificates
/// compare bytewise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Certificate {
    /// Unique certificate identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: CertificateId,
    /// Human-facing certificate number, allocated exactly once at
    /// issuance (e.g. `G2501230001`).
    pub certificate_number: String,
    /// The client the certified item belongs to.
    #[schema(value_type = uuid::Uuid)]
    pub client_id: ClientId,
    /// The certification job this certificate was issued for.
    #[schema(value_type = uuid::Uuid)]
    pub job_id: JobId,
    /// The item category the certificate describes.
    pub category: String,
    /// The schema version the fields were validated against.
    pub schema_version: u32,
    /// Validated attribute values, keyed by field name.
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, Value>,
    /// When the certificate was issued.
    #[schema(value_type = String, example = "2025-01-23T12:00:00Z")]
    pub issued_at: Timestamp,
}

impl Certificate {
    /// Assemble a certificate from validated inputs.
    ///
    /// Callers are responsible for having validated `fields` against
    /// version `schema_version` of `category` and for having allocated
    /// `certificate_number`; this constructor only snapshots them.
    pub fn new(
        certificate_number: String,
        client_id: ClientId,
        job_id: JobId,
        category: String,
        schema_version: u32,
        fields: BTreeMap<String, Value>,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            id: CertificateId::new(),
            certificate_number,
            client_id,
            job_id,
            category,
            schema_version,
            fields,
            issued_at,
        }
    }
}
