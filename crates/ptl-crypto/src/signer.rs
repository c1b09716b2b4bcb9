use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ptl_types::{ChainHash, TypeError};

use crate::hasher::ContentHasher;

/// Short opaque tag attached to every transaction in place of a real
/// signature.
///
/// 8 bytes, rendered as 16 hex characters. Reproducible for the same
/// inputs; carries no secret and proves nothing about the signer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureTag([u8; 8]);

impl SignatureTag {
    /// Create from raw tag bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// The raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Hex representation (16 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 16-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 8] = bytes.try_into().map_err(|v: Vec<u8>| TypeError::InvalidLength {
            expected: 8,
            actual: v.len(),
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for SignatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureTag({})", self.to_hex())
    }
}

impl fmt::Display for SignatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Deterministic pseudo-signer.
///
/// Digests `(transaction hash, actor, timestamp)` into a fixed-length
/// [`SignatureTag`]. This is a stand-in for authentication in a simulated
/// single-writer system, NOT a cryptographic signature: anyone can compute
/// it, and it exists only so every transaction carries a reproducible,
/// actor-bound tag that replay and tests can check.
pub struct TagSigner;

impl TagSigner {
    /// Sign a transaction hash on behalf of `actor` at `timestamp`.
    ///
    /// Pure function of its inputs; no hidden state.
    pub fn sign(tx_hash: &ChainHash, actor: &str, timestamp: DateTime<Utc>) -> SignatureTag {
        let mut hasher = ContentHasher::SIGNATURE.start();
        hasher.update(tx_hash.as_bytes());
        hasher.update(actor.as_bytes());
        hasher.update(&timestamp.timestamp_millis().to_le_bytes());
        let digest = hasher.finalize();
        let mut tag = [0u8; 8];
        tag.copy_from_slice(&digest.as_bytes()[..8]);
        SignatureTag(tag)
    }

    /// Recompute the tag and compare.
    pub fn verify(
        tag: &SignatureTag,
        tx_hash: &ChainHash,
        actor: &str,
        timestamp: DateTime<Utc>,
    ) -> bool {
        Self::sign(tx_hash, actor, timestamp) == *tag
    }
}
