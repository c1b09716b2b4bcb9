use serde::{Deserialize, Serialize};
use serde_json::Value;

use ptl_types::{ChainHash, TxId};

use crate::error::LedgerError;
use crate::records::{Block, Transaction};

/// Summary counters for dashboards and health checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_blocks: u64,
    pub total_transactions: u64,
    pub is_valid: bool,
    pub last_block_hash: ChainHash,
    pub difficulty: usize,
}

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Record an action against the chain tip, seal, and return the
    /// completed transaction. Blocks until the containing block is sealed
    /// and appended.
    fn record(&self, action: &str, payload: Value, actor: &str)
        -> Result<Transaction, LedgerError>;
}

/// Read boundary for ledger query operations.
pub trait LedgerReader: Send + Sync {
    /// Snapshot of the full chain. The caller cannot mutate the ledger
    /// through the returned blocks.
    fn chain(&self) -> Result<Vec<Block>, LedgerError>;

    /// Linear scan across all blocks; `None` when the id misses.
    fn transaction_by_id(&self, id: &TxId) -> Result<Option<Transaction>, LedgerError>;

    /// Pure recomputation and linkage verification of the current chain.
    fn is_valid(&self) -> Result<bool, LedgerError>;

    /// Summary counters.
    fn stats(&self) -> Result<LedgerStats, LedgerError>;
}
