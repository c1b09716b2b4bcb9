use ptl_crypto::meets_difficulty;

use crate::records::Block;

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Position of the offending block in the chain.
    pub index: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    HashMismatch,
    BrokenLink,
    IndexGap,
    DifficultyShortfall,
}

/// Result of a diagnostic chain validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub block_count: u64,
    pub hash_chain_valid: bool,
    pub indexes_continuous: bool,
    pub difficulty_met: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Chain integrity verifier.
///
/// Recomputes every block digest and checks predecessor linkage. All
/// functions are pure: repeated calls on an unmodified chain return the
/// same result and never alter the chain, nonces, or stats.
pub struct ChainValidator;

impl ChainValidator {
    /// Verify the chain by recomputation.
    ///
    /// For every block `i >= 1`: the stored hash must equal the
    /// recomputed digest, and `previous_hash` must equal block `i-1`'s
    /// hash. The genesis block is trusted by construction and not
    /// re-validated against a predecessor.
    pub fn validate(chain: &[Block]) -> bool {
        for i in 1..chain.len() {
            let block = &chain[i];
            match block.recompute_hash() {
                Ok(computed) if computed == block.hash => {}
                _ => return false,
            }
            if block.previous_hash != chain[i - 1].hash {
                return false;
            }
        }
        true
    }

    /// Diagnostic validation: collects every violation instead of
    /// stopping at the first, and additionally checks index continuity
    /// and, when `difficulty` is given, the proof-of-work prefix of every
    /// sealed block.
    pub fn report(chain: &[Block], difficulty: Option<usize>) -> ValidationReport {
        let mut violations = Vec::new();
        let mut hash_chain_valid = true;
        let mut indexes_continuous = true;
        let mut difficulty_met = true;

        for (i, block) in chain.iter().enumerate() {
            if block.index != i as u64 {
                indexes_continuous = false;
                violations.push(Violation {
                    index: i as u64,
                    kind: ViolationKind::IndexGap,
                    description: format!("expected index {i}, found {}", block.index),
                });
            }

            // Genesis is trusted by construction.
            if i == 0 {
                continue;
            }

            match block.recompute_hash() {
                Ok(computed) if computed == block.hash => {}
                _ => {
                    hash_chain_valid = false;
                    violations.push(Violation {
                        index: block.index,
                        kind: ViolationKind::HashMismatch,
                        description: "stored hash does not match recomputed digest".into(),
                    });
                }
            }

            if block.previous_hash != chain[i - 1].hash {
                hash_chain_valid = false;
                violations.push(Violation {
                    index: block.index,
                    kind: ViolationKind::BrokenLink,
                    description: "previous hash link mismatch".into(),
                });
            }

            if let Some(required) = difficulty {
                if !meets_difficulty(&block.hash, required) {
                    difficulty_met = false;
                    violations.push(Violation {
                        index: block.index,
                        kind: ViolationKind::DifficultyShortfall,
                        description: format!(
                            "hash carries fewer than {required} leading zero characters"
                        ),
                    });
                }
            }
        }

        ValidationReport {
            block_count: chain.len() as u64,
            hash_chain_valid,
            indexes_continuous,
            difficulty_met,
            violations,
        }
    }
}
