use serde::{Deserialize, Serialize};

/// Configuration for the ledger's sealing behavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Leading `'0'` hex characters a sealed block hash must carry.
    pub difficulty: usize,
    /// Pending-pool size that triggers sealing. At the default of 1 every
    /// transaction is sealed into its own block immediately.
    pub seal_threshold: usize,
    /// Optional bound on candidate digests per seal. `None` keeps the
    /// search unbounded; operators raising `difficulty` should set this,
    /// as an unbounded search blocks the calling operation indefinitely.
    pub max_seal_attempts: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            seal_threshold: 1,
            max_seal_attempts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seals_every_transaction() {
        let config = LedgerConfig::default();
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.seal_threshold, 1);
        assert_eq!(config.max_seal_attempts, None);
    }

    #[test]
    fn serde_roundtrip() {
        let config = LedgerConfig {
            difficulty: 3,
            seal_threshold: 5,
            max_seal_attempts: Some(1_000_000),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
