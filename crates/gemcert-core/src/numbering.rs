//! # Sequential Number Formats
//!
//! Declarative descriptions of the human-readable numbers minted for jobs
//! and certificates. A [`SequenceFormat`] says how a raw sequence value is
//! rendered (prefix, optional `YYMMDD` date stamp, zero padding) and which
//! counter scope key the sequence draws from.
//!
//! ## Design Decision
//!
//! The format is deliberately separated from the counter. Incrementing the
//! counter must be a single atomic operation at the storage layer, owned by
//! the allocator alone; this module stays storage-agnostic so the same
//! format definitions serve any counter backend. Rendering never fails —
//! the only allocation failure mode a format introduces is exhausting a
//! padded sequence's capacity, and that is reported by the allocator before
//! the counter is advanced.
//!
//! Date-stamped formats fold the date into the scope key, so a new day
//! starts a fresh counter naturally. There is no reset operation: a scope
//! whose sequence is exhausted stays exhausted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First job number handed out for a fresh installation.
pub const JOB_SEQUENCE_FIRST: u64 = 1001;

/// Errors raised while allocating a sequential identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// The padded sequence space for a scope is used up. The counter is
    /// left unchanged; retrying fails until the scope key rolls over.
    #[error("sequence space exhausted for scope {scope_key:?}: capacity {capacity} reached")]
    SequenceExhausted { scope_key: String, capacity: u64 },
}

/// How a sequence value becomes an identifier string, and which counter
/// scope it draws from.
///
/// Two concrete formats exist:
///
/// - [`SequenceFormat::job_numbers`] — `DIA{seq}` from a single global
///   scope, starting at `DIA1001`.
/// - [`SequenceFormat::certificate_numbers`] — `G{YYMMDD}{seq:04}` from a
///   per-day scope, e.g. `G2501230001`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFormat {
    /// Literal prefix, e.g. `"G"` or `"DIA"`.
    pub prefix: String,
    /// Whether the issuance date is stamped into the identifier (`YYMMDD`)
    /// and folded into the scope key.
    pub date_stamp: bool,
    /// Zero-padding width for the sequence component; `0` means unpadded
    /// (and an unbounded sequence).
    pub pad_width: u8,
    /// The sequence value returned by the first allocation in a fresh scope.
    pub first: u64,
    /// Base counter scope key; date-stamped formats append `_{YYMMDD}`.
    pub scope: String,
}

impl SequenceFormat {
    /// The job-number format: `DIA{seq}`, single global scope, first value
    /// `DIA1001`.
    pub fn job_numbers() -> Self {
        Self {
            prefix: "DIA".to_string(),
            date_stamp: false,
            pad_width: 0,
            first: JOB_SEQUENCE_FIRST,
            scope: "job_number".to_string(),
        }
    }

    /// The certificate-number format: `G{YYMMDD}{seq:04}`, one scope per
    /// UTC day, first value `...0001`.
    pub fn certificate_numbers() -> Self {
        Self {
            prefix: "G".to_string(),
            date_stamp: true,
            pad_width: 4,
            first: 1,
            scope: "certificate_number".to_string(),
        }
    }

    /// The counter scope key for an allocation on `date`.
    ///
    /// Date-stamped formats get one counter per day (`certificate_number_250123`);
    /// others share a single scope (`job_number`).
    pub fn scope_key(&self, date: NaiveDate) -> String {
        if self.date_stamp {
            format!("{}_{}", self.scope, date.format("%y%m%d"))
        } else {
            self.scope.clone()
        }
    }

    /// The largest sequence value a padded format can render without
    /// widening, or `None` for unpadded (unbounded) formats.
    pub fn capacity(&self) -> Option<u64> {
        if self.pad_width == 0 {
            return None;
        }
        10u64
            .checked_pow(u32::from(self.pad_width))
            .map(|bound| bound - 1)
    }

    /// Render the identifier string for a sequence value allocated on `date`.
    pub fn render(&self, date: NaiveDate, seq: u64) -> String {
        let mut out = self.prefix.clone();
        if self.date_stamp {
            out.push_str(&date.format("%y%m%d").to_string());
        }
        if self.pad_width > 0 {
            let width = usize::from(self.pad_width);
            out.push_str(&format!("{seq:0width$}"));
        } else {
            out.push_str(&seq.to_string());
        }
        out
    }
}
