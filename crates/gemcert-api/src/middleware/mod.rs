//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`metrics`]: request counters and latency histograms via the
//!   `metrics` facade, exported by the Prometheus recorder.

pub mod metrics;
