//! High-level API for the PharmaTrace Ledger.
//!
//! [`BatchTracker`] wires the in-memory ledger and the batch registry
//! into one explicitly constructed, owned instance, the single
//! initialization point the rest of a process passes by reference. On
//! top of the pass-through registry and ledger operations it provides
//! the flows that span both systems: batch verification, the combined
//! audit view, and dashboard statistics.

pub mod error;
pub mod report;
pub mod tracker;

pub use error::SdkError;
pub use report::{
    AuditSource, BatchSummary, CombinedAudit, CombinedAuditEntry, DashboardStats,
    LaboratoryCounts, StatusCounts, VerificationReport,
};
pub use tracker::{BatchTracker, ACTION_BATCH_VERIFIED, VERIFICATION_ACTOR};
