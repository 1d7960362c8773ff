//! # gemcert-core — Foundational Types for the GemCert Lab Stack
//!
//! This crate is the bedrock of the GemCert workspace. It defines the
//! type-system primitives shared by every other crate: identifier newtypes,
//! the UTC-only timestamp type, and the sequential number formats used to
//! mint human-readable job and certificate numbers.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `JobId`, `CertificateId`,
//!    `ClientId` — all UUID newtypes. No bare strings or raw UUIDs cross a
//!    component boundary, so a job id can never be passed where a client id
//!    is expected.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Non-UTC inputs are rejected at
//!    construction, never silently converted.
//!
//! 3. **Declarative number formats.** `SequenceFormat` describes how a
//!    sequence value becomes an identifier string (prefix, optional date
//!    stamp, zero padding) and how the counter scope key is derived. The
//!    atomic counter itself lives at the storage layer; this crate only
//!    defines what the counter's values look like on paper.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `gemcert-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod identity;
pub mod numbering;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use identity::{CertificateId, ClientId, JobId};
pub use numbering::{AllocationError, SequenceFormat};
pub use temporal::{Timestamp, TimestampError};
