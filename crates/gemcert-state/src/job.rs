//! # Job Lifecycle State Machine
//!
//! Models an inspection/certification job from intake to completion. Every
//! job follows the ordered stage sequence of its kind; an orthogonal status
//! axis overlays the stages for hold/cancel bookkeeping.
//!
//! ## States
//!
//! ```text
//! inspection-only kind:
//!
//!   RECEIVED ──▶ UNDER_INSPECTION ──▶ REPORT_READY ──▶ COMPLETED (stage)
//!
//! certification kind:
//!
//!   RECEIVED ──▶ UNDER_INSPECTION ──▶ QUALITY_CHECKED ──▶ CERTIFICATE_ISSUED ──▶ COMPLETED (stage)
//!                                            │
//!                                            └── the QUALITY_CHECKED ▶ CERTIFICATE_ISSUED step
//!                                                happens only through certificate issuance
//!
//! status axis (any kind):
//!
//!   OPEN ◀──▶ IN_PROGRESS ◀──▶ ON_HOLD        COMPLETED (requires terminal stage)
//!     │            │              │            CANCELLED (from any live status)
//!     └────────────┴──────────────┴──▶ terminal statuses accept no further mutation
//! ```
//!
//! ## Design Decision
//!
//! The two kinds are not two job types. Each kind owns a small explicit
//! stage table, and one transition function walks whichever table the job's
//! kind selects. Subclassing a generic job per kind would duplicate the
//! status axis and the optimistic-concurrency checks for no safety gain.
//!
//! Transitions take the caller's *expected* current stage/status and fail
//! with a conflict error when the job has moved underneath them. The store
//! layer runs these methods inside its atomic update, so a stale caller
//! never clobbers a concurrent writer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use gemcert_core::{CertificateId, ClientId, JobId, Timestamp};

// ─── Job Kinds and Stage Tables ──────────────────────────────────────

/// The two kinds of job, each with its own stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    /// Inspection with a written report; no certificate is issued.
    InspectionOnly,
    /// Inspection ending in an issued certificate.
    Certification,
}

/// Stage sequence for inspection-only jobs.
const INSPECTION_STAGES: [JobStage; 4] = [
    JobStage::Received,
    JobStage::UnderInspection,
    JobStage::ReportReady,
    JobStage::Completed,
];

/// Stage sequence for certification jobs.
const CERTIFICATION_STAGES: [JobStage; 5] = [
    JobStage::Received,
    JobStage::UnderInspection,
    JobStage::QualityChecked,
    JobStage::CertificateIssued,
    JobStage::Completed,
];

impl JobKind {
    /// The ordered stage table for this kind.
    pub fn stages(&self) -> &'static [JobStage] {
        match self {
            JobKind::InspectionOnly => &INSPECTION_STAGES,
            JobKind::Certification => &CERTIFICATION_STAGES,
        }
    }

    /// The stage a freshly created job starts at.
    pub fn first_stage(&self) -> JobStage {
        JobStage::Received
    }

    /// The last stage of this kind's sequence. Both tables end at the
    /// shared COMPLETED stage.
    pub fn terminal_stage(&self) -> JobStage {
        JobStage::Completed
    }

    /// The stage immediately after `current` in this kind's sequence, if
    /// any. `None` when `current` is terminal or foreign to this kind.
    pub fn next_stage(&self, current: JobStage) -> Option<JobStage> {
        let stages = self.stages();
        stages
            .iter()
            .position(|s| *s == current)
            .and_then(|i| stages.get(i + 1))
            .copied()
    }

    /// Whether `stage` belongs to this kind's sequence.
    pub fn has_stage(&self, stage: JobStage) -> bool {
        self.stages().contains(&stage)
    }

    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::InspectionOnly => "INSPECTION_ONLY",
            JobKind::Certification => "CERTIFICATION",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Stages ──────────────────────────────────────────────────────────

/// A position in a job's stage sequence.
///
/// The full set covers both kinds; which stages a given job can occupy is
/// decided by its kind's table, never by this enum alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStage {
    /// Item received and logged.
    Received,
    /// Inspection work underway.
    UnderInspection,
    /// Inspection report drafted (inspection-only kind).
    ReportReady,
    /// Findings passed the quality check (certification kind).
    QualityChecked,
    /// Certificate issued and linked (certification kind).
    CertificateIssued,
    /// All stage work done; the job can be completed.
    Completed,
}

impl JobStage {
    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Received => "RECEIVED",
            JobStage::UnderInspection => "UNDER_INSPECTION",
            JobStage::ReportReady => "REPORT_READY",
            JobStage::QualityChecked => "QUALITY_CHECKED",
            JobStage::CertificateIssued => "CERTIFICATE_ISSUED",
            JobStage::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Status Axis ─────────────────────────────────────────────────────

/// The status axis overlaid on the stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Accepted, not yet being worked.
    Open,
    /// Being worked.
    InProgress,
    /// Work paused; stage advance refuses until resumed.
    OnHold,
    /// Finished; requires the kind's terminal stage. Terminal.
    Completed,
    /// Abandoned before completion. Terminal.
    Cancelled,
}

impl JobStatus {
    /// Whether this status accepts no further stage or status mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "OPEN",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::OnHold => "ON_HOLD",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work priority. Free-standing and mutable at any time; never consulted
/// by transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by job transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// The caller's expected stage is stale.
    #[error("stage conflict: expected {expected}, job is at {actual}")]
    StageConflict {
        expected: JobStage,
        actual: JobStage,
    },

    /// The caller's expected status is stale.
    #[error("status conflict: expected {expected}, job is {actual}")]
    StatusConflict {
        expected: JobStatus,
        actual: JobStatus,
    },

    /// The job is completed or cancelled.
    #[error("job is {status} and accepts no further transitions")]
    Closed { status: JobStatus },

    /// Stage advance attempted while the job is on hold.
    #[error("job is on hold; resume it before advancing the stage")]
    OnHold,

    /// The job is already at its kind's last stage.
    #[error("job is already at its terminal stage {stage}")]
    AtTerminalStage { stage: JobStage },

    /// Manual advance tried to enter a stage reserved for issuance.
    #[error("stage {stage} is entered by certificate issuance, not manual advance")]
    StageRequiresIssuance { stage: JobStage },

    /// Completion requested before the stage sequence finished.
    #[error("status COMPLETED requires the terminal stage, job is at {stage}")]
    NotAtTerminalStage { stage: JobStage },

    /// Certificate issuance attempted on a non-certification job.
    #[error("job kind {kind} does not issue certificates")]
    NotCertificationKind { kind: JobKind },

    /// The job already carries a certificate.
    #[error("job already has certificate {certificate_id} linked")]
    CertificateAlreadyLinked { certificate_id: CertificateId },

    /// Certificate issuance attempted at the wrong stage.
    #[error("certificate issuance requires stage {required}, job is at {actual}")]
    NotReadyForCertificate {
        required: JobStage,
        actual: JobStage,
    },
}

// ─── Transition Record ───────────────────────────────────────────────

/// One entry in a job's transition history.
///
/// Both axes are recorded each time; the unchanged axis repeats its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobTransition {
    /// When the transition occurred.
    #[schema(value_type = String, example = "2025-01-23T12:00:00Z")]
    pub at: Timestamp,
    /// Stage before the transition.
    pub from_stage: JobStage,
    /// Stage after the transition.
    pub to_stage: JobStage,
    /// Status before the transition.
    pub from_status: JobStatus,
    /// Status after the transition.
    pub to_status: JobStatus,
    /// Optional caller-supplied note (e.g. a cancellation reason).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ─── Job ─────────────────────────────────────────────────────────────

/// A tracked inspection/certification job.
///
/// All mutation goes through the transition methods, which enforce the
/// stage table, the status rules, and the caller's optimistic-concurrency
/// expectations. No mutation happens on any failure path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Job {
    /// Unique job identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: JobId,
    /// Human-facing job number, allocated exactly once at creation
    /// (e.g. `DIA1001`).
    pub job_number: String,
    /// The client this job belongs to.
    #[schema(value_type = uuid::Uuid)]
    pub client_id: ClientId,
    /// Which stage table this job follows.
    pub kind: JobKind,
    /// Current stage; always a member of the kind's table.
    pub stage: JobStage,
    /// Current status.
    pub status: JobStatus,
    /// Work priority.
    pub priority: Priority,
    /// The certificate issued for this job, if any (certification kind only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<uuid::Uuid>)]
    pub certificate_id: Option<CertificateId>,
    /// When the job was created.
    #[schema(value_type = String, example = "2025-01-23T12:00:00Z")]
    pub created_at: Timestamp,
    /// When the job last changed.
    #[schema(value_type = String, example = "2025-01-23T12:00:00Z")]
    pub updated_at: Timestamp,
    /// Ordered log of stage/status transitions.
    #[serde(default)]
    pub transitions: Vec<JobTransition>,
}

impl Job {
    /// Create a job at its kind's first stage with status OPEN.
    ///
    /// `job_number` must come from the allocator; this type never mints
    /// numbers and never re-allocates one.
    pub fn new(
        client_id: ClientId,
        kind: JobKind,
        priority: Priority,
        job_number: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id: JobId::new(),
            job_number,
            client_id,
            kind,
            stage: kind.first_stage(),
            status: JobStatus::Open,
            priority,
            certificate_id: None,
            created_at: now,
            updated_at: now,
            transitions: Vec::new(),
        }
    }

    /// Whether the job accepts no further stage or status mutation.
    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Advance the stage to the immediate next stage of the kind's
    /// sequence.
    ///
    /// `expected` is the stage the caller believes the job is at; a
    /// mismatch fails with [`JobError::StageConflict`] and nothing
    /// changes. The CERTIFICATE_ISSUED stage cannot be entered this way —
    /// issuing the certificate performs that step.
    pub fn advance_stage(
        &mut self,
        expected: JobStage,
        now: Timestamp,
    ) -> Result<JobStage, JobError> {
        self.require_workable()?;
        if self.stage != expected {
            return Err(JobError::StageConflict {
                expected,
                actual: self.stage,
            });
        }
        let next = self
            .kind
            .next_stage(self.stage)
            .ok_or(JobError::AtTerminalStage { stage: self.stage })?;
        if next == JobStage::CertificateIssued {
            return Err(JobError::StageRequiresIssuance { stage: next });
        }

        let (from_stage, from_status) = (self.stage, self.status);
        self.stage = next;
        self.record_transition(from_stage, from_status, None, now);
        Ok(next)
    }

    /// Change the status axis.
    ///
    /// `expected` is the status the caller believes the job has; a
    /// mismatch fails with [`JobError::StatusConflict`]. COMPLETED
    /// additionally requires the kind's terminal stage. Setting the status
    /// a job already has (with a matching expectation) is an accepted
    /// no-op and records no transition.
    pub fn set_status(
        &mut self,
        new_status: JobStatus,
        expected: JobStatus,
        note: Option<String>,
        now: Timestamp,
    ) -> Result<(), JobError> {
        if self.status.is_terminal() {
            return Err(JobError::Closed {
                status: self.status,
            });
        }
        if self.status != expected {
            return Err(JobError::StatusConflict {
                expected,
                actual: self.status,
            });
        }
        if new_status == self.status {
            return Ok(());
        }
        if new_status == JobStatus::Completed && self.stage != self.kind.terminal_stage() {
            return Err(JobError::NotAtTerminalStage { stage: self.stage });
        }

        let (from_stage, from_status) = (self.stage, self.status);
        self.status = new_status;
        self.record_transition(from_stage, from_status, note, now);
        Ok(())
    }

    /// Change the priority. Always permitted, even on closed jobs; no
    /// transition is recorded.
    pub fn set_priority(&mut self, priority: Priority, now: Timestamp) {
        self.priority = priority;
        self.updated_at = now;
    }

    /// Check whether this job can receive a certificate right now.
    ///
    /// Requires: certification kind, no certificate linked yet, a workable
    /// status, and the QUALITY_CHECKED stage.
    pub fn certificate_readiness(&self) -> Result<(), JobError> {
        if self.kind != JobKind::Certification {
            return Err(JobError::NotCertificationKind { kind: self.kind });
        }
        if let Some(certificate_id) = self.certificate_id {
            return Err(JobError::CertificateAlreadyLinked { certificate_id });
        }
        self.require_workable()?;
        if self.stage != JobStage::QualityChecked {
            return Err(JobError::NotReadyForCertificate {
                required: JobStage::QualityChecked,
                actual: self.stage,
            });
        }
        Ok(())
    }

    /// Link an issued certificate and step the stage to
    /// CERTIFICATE_ISSUED.
    ///
    /// Re-runs [`Job::certificate_readiness`] first, so running this
    /// inside the store's atomic update is exactly the "check and link in
    /// one atomic unit" the at-most-one-certificate rule needs.
    pub fn attach_certificate(
        &mut self,
        certificate_id: CertificateId,
        now: Timestamp,
    ) -> Result<(), JobError> {
        self.certificate_readiness()?;

        let (from_stage, from_status) = (self.stage, self.status);
        self.certificate_id = Some(certificate_id);
        self.stage = JobStage::CertificateIssued;
        self.record_transition(from_stage, from_status, None, now);
        Ok(())
    }

    /// Reject mutation when the status is terminal or on hold.
    fn require_workable(&self) -> Result<(), JobError> {
        if self.status.is_terminal() {
            return Err(JobError::Closed {
                status: self.status,
            });
        }
        if self.status == JobStatus::OnHold {
            return Err(JobError::OnHold);
        }
        Ok(())
    }

    /// Append a transition record and bump `updated_at`.
    fn record_transition(
        &mut self,
        from_stage: JobStage,
        from_status: JobStatus,
        note: Option<String>,
        now: Timestamp,
    ) {
        self.transitions.push(JobTransition {
            at: now,
            from_stage,
            to_stage: self.stage,
            from_status,
            to_status: self.status,
            note,
        });
        self.updated_at = now;
    }
}
