use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ptl_crypto::{ContentHasher, NonceSearch, SignatureTag};
use ptl_types::{ChainHash, TxId};

use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// A single recorded action with payload, hash, and pseudo-signature.
///
/// `previous_hash` is the hash of the last *sealed block* at submission
/// time, not of the prior transaction: every transaction admitted into
/// the same block carries the same `previous_hash`. Immutable once
/// created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub payload: Value,
    pub previous_hash: ChainHash,
    pub hash: ChainHash,
    pub signature: SignatureTag,
}

impl Transaction {
    /// Canonical digest over `(id, timestamp, action, payload,
    /// previous_hash)`.
    pub fn content_hash(
        id: &TxId,
        timestamp: DateTime<Utc>,
        action: &str,
        payload: &Value,
        previous_hash: &ChainHash,
    ) -> Result<ChainHash, LedgerError> {
        let payload_bytes =
            serde_json::to_vec(payload).map_err(|e| LedgerError::Serialization(e.to_string()))?;

        let mut hasher = ContentHasher::TRANSACTION.start();
        hasher.update(id.as_uuid().as_bytes());
        hasher.update(&timestamp.timestamp_millis().to_le_bytes());
        hasher.update(action.as_bytes());
        hasher.update(&payload_bytes);
        hasher.update(previous_hash.as_bytes());
        Ok(ChainHash::from_hash(*hasher.finalize().as_bytes()))
    }

    /// Recompute this transaction's digest from its stored fields.
    pub fn recompute_hash(&self) -> Result<ChainHash, LedgerError> {
        Self::content_hash(
            &self.id,
            self.timestamp,
            &self.action,
            &self.payload,
            &self.previous_hash,
        )
    }
}

/// A sealed group of transactions chained to its predecessor.
///
/// For every block `i > 0`, `previous_hash` equals block `i-1`'s hash and
/// `hash` carries the configured number of leading zero hex characters.
/// Never mutated after sealing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub previous_hash: ChainHash,
    pub hash: ChainHash,
    pub nonce: u64,
}

impl Block {
    /// The fixed, trusted first block: no transactions, zero predecessor,
    /// epoch timestamp, nonce 0, hash computed normally (the difficulty
    /// requirement does not apply to genesis).
    pub fn genesis() -> Self {
        let timestamp = DateTime::UNIX_EPOCH;
        let previous_hash = ChainHash::zero();
        let hash = Self::content_hash(0, timestamp, &[], &previous_hash, 0)
            .expect("genesis content is statically serializable");
        Self {
            index: 0,
            timestamp,
            transactions: Vec::new(),
            previous_hash,
            hash,
            nonce: 0,
        }
    }

    /// Canonical digest over `(index, timestamp, transactions,
    /// previous_hash, nonce)`. Covers the full transaction content, so
    /// any payload tampering changes the block digest.
    pub fn content_hash(
        index: u64,
        timestamp: DateTime<Utc>,
        transactions: &[Transaction],
        previous_hash: &ChainHash,
        nonce: u64,
    ) -> Result<ChainHash, LedgerError> {
        let tx_bytes = canonical_tx_bytes(transactions)?;
        Ok(hash_parts(index, timestamp, &tx_bytes, previous_hash, nonce))
    }

    /// Recompute this block's digest from its stored fields.
    pub fn recompute_hash(&self) -> Result<ChainHash, LedgerError> {
        Self::content_hash(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.previous_hash,
            self.nonce,
        )
    }

    /// Seal a candidate block: search `nonce = 1, 2, 3, …` until the
    /// digest qualifies at the configured difficulty.
    ///
    /// Deterministic: identical inputs always yield the same nonce and
    /// hash. Blocking and CPU-bound; with `max_seal_attempts` unset the
    /// search has no time limit and no cancellation.
    pub fn seal(
        index: u64,
        timestamp: DateTime<Utc>,
        transactions: Vec<Transaction>,
        previous_hash: ChainHash,
        config: &LedgerConfig,
    ) -> Result<Self, LedgerError> {
        let tx_bytes = canonical_tx_bytes(&transactions)?;

        let mut search = NonceSearch::new(config.difficulty);
        if let Some(bound) = config.max_seal_attempts {
            search = search.with_max_attempts(bound);
        }
        let sealed =
            search.run(|nonce| hash_parts(index, timestamp, &tx_bytes, &previous_hash, nonce))?;

        Ok(Self {
            index,
            timestamp,
            transactions,
            previous_hash,
            hash: sealed.hash,
            nonce: sealed.nonce,
        })
    }
}

fn canonical_tx_bytes(transactions: &[Transaction]) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(transactions).map_err(|e| LedgerError::Serialization(e.to_string()))
}

fn hash_parts(
    index: u64,
    timestamp: DateTime<Utc>,
    tx_bytes: &[u8],
    previous_hash: &ChainHash,
    nonce: u64,
) -> ChainHash {
    let mut hasher = ContentHasher::BLOCK.start();
    hasher.update(&index.to_le_bytes());
    hasher.update(&timestamp.timestamp_millis().to_le_bytes());
    hasher.update(tx_bytes);
    hasher.update(previous_hash.as_bytes());
    hasher.update(&nonce.to_le_bytes());
    ChainHash::from_hash(*hasher.finalize().as_bytes())
}
