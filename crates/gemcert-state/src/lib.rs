//! # gemcert-state — Lifecycle State Machines
//!
//! Domain state for the GemCert workflow. The centerpiece is the [`Job`]
//! state machine: a job moves through an ordered stage sequence chosen by
//! its kind, carries an orthogonal status axis, and — for certification
//! jobs — ends up linked to exactly one issued [`Certificate`].
//!
//! All transition rules live on the types themselves. Callers (the API
//! layer's stores) supply optimistic-concurrency expectations and apply
//! mutations inside their own atomic update; this crate stays free of
//! locks and storage.
//!
//! ## Crate Policy
//!
//! - Depends only on `gemcert-core` internally.
//! - No `unsafe` code, no `panic!()` or `.unwrap()` outside tests.
//! - Every transition either succeeds or returns a typed [`JobError`];
//!   no mutation happens on the failure path.

pub mod certificate;
pub mod job;

pub use certificate::Certificate;
pub use job::{Job, JobError, JobKind, JobStage, JobStatus, JobTransition, Priority};
