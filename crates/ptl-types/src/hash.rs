use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// 32-byte BLAKE3 digest used to link transactions and blocks.
///
/// A `ChainHash` is the digest of a record's canonical content. Identical
/// content always produces the same `ChainHash`, which is what makes the
/// chain verifiable by recomputation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainHash([u8; 32]);

impl ChainHash {
    /// Create a `ChainHash` from a pre-computed digest.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Compute a `ChainHash` directly from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// The all-zero hash. Serves as the genesis block's predecessor.
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the all-zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Number of leading `'0'` characters in the hex representation.
    ///
    /// This is the proof-of-work difficulty measure: a block hash
    /// qualifies at difficulty `d` when this count is at least `d`.
    pub fn leading_zero_chars(&self) -> usize {
        let mut count = 0;
        for byte in &self.0 {
            if byte >> 4 != 0 {
                return count;
            }
            count += 1;
            if byte & 0x0f != 0 {
                return count;
            }
            count += 1;
        }
        count
    }
}

impl fmt::Debug for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainHash({})", self.short_hex())
    }
}

impl fmt::Display for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ChainHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ChainHash> for [u8; 32] {
    fn from(hash: ChainHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_is_deterministic() {
        let data = b"batch record";
        let h1 = ChainHash::from_bytes(data);
        let h2 = ChainHash::from_bytes(data);
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_data_produces_different_hashes() {
        assert_ne!(ChainHash::from_bytes(b"a"), ChainHash::from_bytes(b"b"));
    }

    #[test]
    fn zero_is_all_zeros() {
        let zero = ChainHash::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.as_bytes(), &[0u8; 32]);
        assert_eq!(zero.leading_zero_chars(), 64);
    }

    #[test]
    fn hex_roundtrip() {
        let hash = ChainHash::from_bytes(b"roundtrip");
        let parsed = ChainHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(
            ChainHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(matches!(
            ChainHash::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 2
            })
        ));
    }

    #[test]
    fn leading_zero_chars_counts_nibbles() {
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0x0f; // hex "0f..." -> one leading zero char
        assert_eq!(ChainHash::from_hash(bytes).leading_zero_chars(), 1);

        bytes[0] = 0x00;
        bytes[1] = 0x0f; // hex "000f..." -> three leading zero chars
        assert_eq!(ChainHash::from_hash(bytes).leading_zero_chars(), 3);

        bytes[1] = 0xf0; // hex "00f0..." -> two leading zero chars
        assert_eq!(ChainHash::from_hash(bytes).leading_zero_chars(), 2);
    }

    #[test]
    fn leading_zero_chars_matches_hex_prefix() {
        let hash = ChainHash::from_bytes(b"prefix check");
        let zeros = hash.leading_zero_chars();
        let hex = hash.to_hex();
        assert!(hex.chars().take(zeros).all(|c| c == '0'));
        assert_ne!(hex.chars().nth(zeros), Some('0'));
    }

    #[test]
    fn display_is_full_hex() {
        let hash = ChainHash::from_bytes(b"display");
        assert_eq!(format!("{hash}").len(), 64);
        assert_eq!(format!("{hash}"), hash.to_hex());
    }

    #[test]
    fn serde_roundtrip() {
        let hash = ChainHash::from_bytes(b"serde");
        let json = serde_json::to_string(&hash).unwrap();
        let parsed: ChainHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, parsed);
    }
}
