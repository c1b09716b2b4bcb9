//! Batch lifecycle registry for the PharmaTrace system.
//!
//! Holds the in-memory batch store, enforces the approval state machine,
//! and keeps the secondary audit trail. Every registry mutation is
//! mirrored into the ledger and/or the audit trail, but the three stores
//! are reconciled only by batch id and timestamps: there is no single
//! transactional boundary across them, and callers must expect eventual
//! (not atomic) cross-system consistency.

pub mod audit;
pub mod batch;
pub mod error;
pub mod registry;

pub use audit::{AuditLogEntry, AuditTrail};
pub use batch::{BatchDraft, BatchRecord, DistributionEntry, QualityCertificate};
pub use error::RegistryError;
pub use registry::{BatchRegistry, ACTION_BATCH_CREATED, AUDIT_BATCH_CREATED, AUDIT_STATUS_UPDATED};
