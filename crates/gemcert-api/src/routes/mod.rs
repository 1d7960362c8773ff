//! # API Route Modules
//!
//! Route modules for the GemCert API surface:
//!
//! - `clients` — client directory (registration and lookup).
//! - `jobs` — job lifecycle: creation with number allocation, stage
//!   advancement, status and priority changes.
//! - `certificates` — certificate issuance against the active category
//!   schema, plus lookup by certificate number.
//! - `schemas` — versioned category schema registry.

pub mod certificates;
pub mod clients;
pub mod jobs;
pub mod schemas;
