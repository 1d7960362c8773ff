//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that cross component boundaries.
//! These prevent accidental identifier confusion — you cannot pass a
//! `JobId` where a `ClientId` is expected.
//!
//! The human-facing numbers (`DIA1001`, `G2501230001`) are not identifiers
//! in this sense: they are rendered strings minted by the allocator (see
//! [`crate::numbering`]) and carried on the records that own them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an inspection/certification job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

/// Unique identifier for an issued certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub Uuid);

/// Unique identifier for a client on whose behalf jobs are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub Uuid);

impl JobId {
    /// Generate a new random job identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl CertificateId {
    /// Generate a new random certificate identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl ClientId {
    /// Generate a new random client identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CertificateId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job:{}", self.0)
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "certificate:{}", self.0)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client:{}", self.0)
    }
}
