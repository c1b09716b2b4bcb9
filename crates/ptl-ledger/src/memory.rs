use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use ptl_crypto::TagSigner;
use ptl_types::{ChainHash, TxId};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::records::{Block, Transaction};
use crate::traits::{LedgerReader, LedgerStats, LedgerWriter};
use crate::validation::ChainValidator;

/// In-memory, process-lifetime chain store.
///
/// A single `RwLock` guards the chain and the pending pool: appends are
/// serialized, and readers always observe a fully sealed prefix of the
/// chain, never a partially written block. All state is volatile; any
/// durability concern lives outside this crate.
pub struct InMemoryLedger {
    config: LedgerConfig,
    inner: RwLock<ChainState>,
}

struct ChainState {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl InMemoryLedger {
    /// Create a ledger holding only the genesis block.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(ChainState {
                chain: vec![Block::genesis()],
                pending: Vec::new(),
            }),
        }
    }

    /// The sealing configuration this ledger was constructed with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Record an action against the chain tip.
    ///
    /// Builds a transaction referencing the current tip's hash, computes
    /// its digest and signature tag, admits it to the pending pool, and,
    /// once the pool reaches the seal threshold, synchronously mines the
    /// block. The call does not return until sealing completes: with the
    /// default threshold of 1 every call blocks for one full nonce search
    /// (expected 256 candidate digests at difficulty 2, unbounded unless
    /// `max_seal_attempts` is configured).
    ///
    /// On a sealing failure the admission is rolled back; the chain and
    /// pool are left exactly as before the call.
    pub fn add_transaction(
        &self,
        action: &str,
        payload: Value,
        actor: &str,
    ) -> Result<Transaction, LedgerError> {
        let mut state = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;

        let previous_hash = tip_hash(&state.chain);
        let id = TxId::new();
        let timestamp = Utc::now();

        let mut payload = payload;
        if let Value::Object(map) = &mut payload {
            map.insert("performed_by".into(), Value::String(actor.to_string()));
        }

        let hash = Transaction::content_hash(&id, timestamp, action, &payload, &previous_hash)?;
        let signature = TagSigner::sign(&hash, actor, timestamp);

        let tx = Transaction {
            id,
            timestamp,
            action: action.to_string(),
            payload,
            previous_hash,
            hash,
            signature,
        };

        state.pending.push(tx.clone());
        debug!(tx = %tx.id, action, pool = state.pending.len(), "transaction admitted");

        if state.pending.len() >= self.config.seal_threshold {
            if let Err(err) = seal_pending(&mut state, &self.config) {
                state.pending.pop();
                return Err(err);
            }
        }

        Ok(tx)
    }

    /// Snapshot of the full chain. Mutating the copy has no effect on
    /// the ledger.
    pub fn chain(&self) -> Result<Vec<Block>, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.chain.clone())
    }

    /// Linear scan across all sealed blocks; `None` when the id misses.
    pub fn transaction_by_id(&self, id: &TxId) -> Result<Option<Transaction>, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state
            .chain
            .iter()
            .flat_map(|block| block.transactions.iter())
            .find(|tx| tx.id == *id)
            .cloned())
    }

    /// Recompute and verify the whole chain. Read-only: holds the read
    /// lock, so it never runs concurrently with an append and never
    /// mutates chain state.
    pub fn is_valid(&self) -> Result<bool, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(ChainValidator::validate(&state.chain))
    }

    /// Summary counters over a consistent snapshot.
    pub fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(LedgerStats {
            total_blocks: state.chain.len() as u64,
            total_transactions: state
                .chain
                .iter()
                .map(|block| block.transactions.len() as u64)
                .sum(),
            is_valid: ChainValidator::validate(&state.chain),
            last_block_hash: tip_hash(&state.chain),
            difficulty: self.config.difficulty,
        })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl LedgerWriter for InMemoryLedger {
    fn record(
        &self,
        action: &str,
        payload: Value,
        actor: &str,
    ) -> Result<Transaction, LedgerError> {
        self.add_transaction(action, payload, actor)
    }
}

impl LedgerReader for InMemoryLedger {
    fn chain(&self) -> Result<Vec<Block>, LedgerError> {
        self.chain()
    }

    fn transaction_by_id(&self, id: &TxId) -> Result<Option<Transaction>, LedgerError> {
        self.transaction_by_id(id)
    }

    fn is_valid(&self) -> Result<bool, LedgerError> {
        self.is_valid()
    }

    fn stats(&self) -> Result<LedgerStats, LedgerError> {
        self.stats()
    }
}

fn tip_hash(chain: &[Block]) -> ChainHash {
    // The chain always holds at least the genesis block.
    chain.last().map(|b| b.hash).unwrap_or_else(ChainHash::zero)
}

fn seal_pending(state: &mut ChainState, config: &LedgerConfig) -> Result<(), LedgerError> {
    let index = state.chain.len() as u64;
    let previous_hash = tip_hash(&state.chain);

    let block = Block::seal(
        index,
        Utc::now(),
        state.pending.clone(),
        previous_hash,
        config,
    )?;

    info!(
        index,
        nonce = block.nonce,
        hash = %block.hash.short_hex(),
        transactions = block.transactions.len(),
        "block sealed"
    );

    state.pending.clear();
    state.chain.push(block);
    Ok(())
}
