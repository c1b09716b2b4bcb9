//! Foundation types for the PharmaTrace Ledger (PTL).
//!
//! This crate provides the hash, identifier, and lifecycle types used
//! throughout the PTL system. Every other PTL crate depends on `ptl-types`.
//!
//! # Key Types
//!
//! - [`ChainHash`] — 32-byte BLAKE3 digest linking transactions and blocks
//! - [`TxId`] — UUID v7 transaction identifier
//! - [`RecordId`] — surrogate key for batch records (distinct from the
//!   human-assigned business key)
//! - [`EntryId`] — identifier for certificates, distribution entries, and
//!   audit entries
//! - [`BatchStatus`] — the batch approval state machine
//! - [`CertResult`], [`RecipientType`], [`DistributionStatus`] — sub-record
//!   vocabularies

pub mod error;
pub mod hash;
pub mod id;
pub mod status;

pub use error::TypeError;
pub use hash::ChainHash;
pub use id::{EntryId, RecordId, TxId};
pub use status::{BatchStatus, CertResult, DistributionStatus, RecipientType};
