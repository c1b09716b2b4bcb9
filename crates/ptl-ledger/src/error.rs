use ptl_crypto::PowError;

/// Errors produced by ledger operations.
///
/// All variants are in the fatal/unrecoverable class: lookups that miss
/// return `Option`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("canonical serialization failed: {0}")]
    Serialization(String),

    #[error("block sealing exhausted the effort bound after {attempts} attempts")]
    EffortExhausted { attempts: u64 },

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl From<PowError> for LedgerError {
    fn from(err: PowError) -> Self {
        match err {
            PowError::EffortExhausted { attempts } => Self::EffortExhausted { attempts },
        }
    }
}
