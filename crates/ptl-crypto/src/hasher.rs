use ptl_types::ChainHash;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"ptl-tx-v1"`, `"ptl-block-v1"`)
/// that is prepended to every hash computation. This prevents cross-type
/// hash collisions: a transaction and a block with identical bytes will
/// produce different digests.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for transaction content.
    pub const TRANSACTION: Self = Self {
        domain: "ptl-tx-v1",
    };
    /// Hasher for block content.
    pub const BLOCK: Self = Self {
        domain: "ptl-block-v1",
    };
    /// Hasher for signature tags.
    pub const SIGNATURE: Self = Self {
        domain: "ptl-sig-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Begin a streaming hash with this domain tag already applied.
    ///
    /// Callers append canonical field bytes and finalize themselves.
    pub fn start(&self) -> blake3::Hasher {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ChainHash {
        let mut hasher = self.start();
        hasher.update(data);
        ChainHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as canonical JSON with domain separation.
    pub fn hash_value<T: serde::Serialize>(&self, value: &T) -> Result<ChainHash, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &ChainHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"batch payload";
        assert_eq!(
            ContentHasher::TRANSACTION.hash(data),
            ContentHasher::TRANSACTION.hash(data)
        );
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        let tx = ContentHasher::TRANSACTION.hash(data);
        let block = ContentHasher::BLOCK.hash(data);
        let sig = ContentHasher::SIGNATURE.hash(data);
        assert_ne!(tx, block);
        assert_ne!(tx, sig);
        assert_ne!(block, sig);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = ContentHasher::BLOCK.start();
        hasher.update(b"chunk");
        let streamed = ChainHash::from_hash(*hasher.finalize().as_bytes());
        assert_eq!(streamed, ContentHasher::BLOCK.hash(b"chunk"));
    }

    #[test]
    fn verify_correct_and_tampered_data() {
        let data = b"test data";
        let digest = ContentHasher::TRANSACTION.hash(data);
        assert!(ContentHasher::TRANSACTION.verify(data, &digest));
        assert!(!ContentHasher::TRANSACTION.verify(b"tampered", &digest));
    }

    #[test]
    fn hash_value_works() {
        let value = serde_json::json!({"batch_id": "PT-2024-001", "quantity": 10000});
        let digest = ContentHasher::TRANSACTION.hash_value(&value).unwrap();
        assert!(!digest.is_zero());
    }

    #[test]
    fn custom_domain() {
        let hasher = ContentHasher::new("ptl-custom-v1");
        assert_ne!(hasher.hash(b"data"), ContentHasher::BLOCK.hash(b"data"));
    }
}
