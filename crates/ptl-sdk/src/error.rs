use thiserror::Error;

use ptl_ledger::LedgerError;
use ptl_registry::RegistryError;

/// Errors surfaced by the high-level tracker API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
