use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ptl_crypto::SignatureTag;
use ptl_ledger::{LedgerStats, Transaction};
use ptl_registry::BatchRecord;
use ptl_types::{BatchStatus, ChainHash, RecordId};

/// The batch fields exposed to verification callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub id: RecordId,
    pub batch_id: String,
    pub product_name: String,
    pub formula: String,
    pub status: BatchStatus,
    pub laboratory_name: String,
    pub production_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub quantity: u64,
    pub unit: String,
    pub blockchain_hash: String,
}

impl From<&BatchRecord> for BatchSummary {
    fn from(record: &BatchRecord) -> Self {
        Self {
            id: record.id,
            batch_id: record.batch_id.clone(),
            product_name: record.product_name.clone(),
            formula: record.formula.clone(),
            status: record.status,
            laboratory_name: record.laboratory_name.clone(),
            production_date: record.production_date,
            expiry_date: record.expiry_date,
            quantity: record.quantity,
            unit: record.unit.clone(),
            blockchain_hash: record.blockchain_hash.clone(),
        }
    }
}

/// Result of a successful batch verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub batch: BatchSummary,
    /// The `BATCH_VERIFIED` transaction this verification mined.
    pub transaction: Transaction,
    pub chain_valid: bool,
    pub last_block_hash: ChainHash,
}

/// Which store an audit row came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSource {
    /// The registry's human-readable audit trail.
    Registry,
    /// A transaction recorded on the chain.
    Ledger,
}

/// One row of the merged audit view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedAuditEntry {
    pub id: String,
    pub source: AuditSource,
    pub action: String,
    pub details: String,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub batch_id: Option<String>,
    /// Present on ledger rows only.
    pub hash: Option<ChainHash>,
    /// Present on ledger rows only.
    pub signature: Option<SignatureTag>,
}

/// The merged audit view: registry entries and ledger transactions,
/// newest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedAudit {
    pub entries: Vec<CombinedAuditEntry>,
    /// Count before the caller's limit was applied.
    pub total: u64,
    pub chain_valid: bool,
}

/// Batch counts per status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub recalled: u64,
    pub blocked: u64,
}

/// Laboratory participation counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaboratoryCounts {
    /// Distinct laboratories with at least one registered batch.
    pub total: u64,
    /// Distinct laboratories with at least one approved batch.
    pub active: u64,
}

/// Snapshot for the operator dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub ledger: LedgerStats,
    pub batches: StatusCounts,
    pub laboratories: LaboratoryCounts,
}
