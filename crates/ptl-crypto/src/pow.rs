use ptl_types::ChainHash;

/// Returns `true` iff the hex form of `hash` starts with `difficulty`
/// `'0'` characters.
pub fn meets_difficulty(hash: &ChainHash, difficulty: usize) -> bool {
    hash.leading_zero_chars() >= difficulty
}

/// Result of a successful nonce search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sealed {
    /// The qualifying nonce.
    pub nonce: u64,
    /// The qualifying digest.
    pub hash: ChainHash,
    /// Number of candidate digests computed, including the winner.
    pub attempts: u64,
}

/// Errors from the nonce search.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PowError {
    #[error("nonce search exhausted after {attempts} attempts")]
    EffortExhausted { attempts: u64 },
}

/// Proof-of-work nonce search.
///
/// Tries `nonce = 1, 2, 3, …` against a caller-supplied candidate digest
/// function until the digest qualifies at the configured difficulty.
/// Deterministic: the same digest function and difficulty always yield the
/// same nonce and hash.
///
/// The search is CPU-bound and synchronous, and unbounded unless
/// [`with_max_attempts`](Self::with_max_attempts) is set. At difficulty
/// `d` the expected search length is `16^d` attempts (256 at the default
/// difficulty 2), but a caller raising difficulty without setting a bound
/// accepts an indefinitely blocking call.
#[derive(Clone, Copy, Debug)]
pub struct NonceSearch {
    difficulty: usize,
    max_attempts: Option<u64>,
}

impl NonceSearch {
    /// A search at the given difficulty with no effort bound.
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty,
            max_attempts: None,
        }
    }

    /// Bound the search to at most `bound` candidate digests.
    pub fn with_max_attempts(mut self, bound: u64) -> Self {
        self.max_attempts = Some(bound);
        self
    }

    /// The configured difficulty.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Run the search. `hash_at` must be a pure function of the nonce.
    pub fn run<F>(&self, mut hash_at: F) -> Result<Sealed, PowError>
    where
        F: FnMut(u64) -> ChainHash,
    {
        let mut attempts: u64 = 0;
        let mut nonce: u64 = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(PowError::EffortExhausted { attempts });
                }
            }
            nonce += 1;
            attempts += 1;
            let hash = hash_at(nonce);
            if meets_difficulty(&hash, self.difficulty) {
                return Ok(Sealed {
                    nonce,
                    hash,
                    attempts,
                });
            }
        }
    }
}
