use thiserror::Error;

use ptl_ledger::LedgerError;
use ptl_types::BatchStatus;

/// Errors produced by registry operations.
///
/// Lookups that miss return `Option`, never an error; these variants
/// cover rejected operations and fatal subsystem failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("batch id already registered: {0}")]
    DuplicateBatchId(String),

    #[error("batch {batch_id} already decided as {status}; decisions are one-shot")]
    AlreadyDecided {
        batch_id: String,
        status: BatchStatus,
    },

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: BatchStatus,
        to: BatchStatus,
    },

    #[error("registry lock poisoned")]
    LockPoisoned,

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
