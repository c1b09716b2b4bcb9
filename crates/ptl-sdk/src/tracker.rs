use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use ptl_ledger::{Block, InMemoryLedger, LedgerConfig, LedgerStats};
use ptl_registry::{AuditLogEntry, BatchDraft, BatchRecord, BatchRegistry};
use ptl_types::{BatchStatus, RecordId};

use crate::error::SdkError;
use crate::report::{
    AuditSource, BatchSummary, CombinedAudit, CombinedAuditEntry, DashboardStats,
    LaboratoryCounts, StatusCounts, VerificationReport,
};

/// Ledger action tag written by the verification flow.
pub const ACTION_BATCH_VERIFIED: &str = "BATCH_VERIFIED";
/// Actor attributed to verification transactions.
pub const VERIFICATION_ACTOR: &str = "Verification System";

/// Owned entry point for the whole tracking core.
///
/// Constructed once at process start and passed by reference to every
/// consumer; nothing here is reachable through ambient global state.
/// Wires the in-memory ledger and the batch registry together and adds
/// the flows that span both: verification, the combined audit view, and
/// dashboard statistics.
pub struct BatchTracker {
    ledger: Arc<InMemoryLedger>,
    registry: BatchRegistry<InMemoryLedger>,
}

impl BatchTracker {
    /// Build a tracker with the given sealing configuration.
    pub fn new(config: LedgerConfig) -> Self {
        let ledger = Arc::new(InMemoryLedger::new(config));
        let registry = BatchRegistry::new(Arc::clone(&ledger));
        Self { ledger, registry }
    }

    /// The underlying registry, for callers that need it directly.
    pub fn registry(&self) -> &BatchRegistry<InMemoryLedger> {
        &self.registry
    }

    /// The underlying ledger, for callers that need it directly.
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    // ---- Registry pass-through ----

    /// Register a batch; enters as `Pending`.
    pub fn register_batch(&self, draft: BatchDraft) -> Result<BatchRecord, SdkError> {
        Ok(self.registry.create_batch(draft)?)
    }

    /// Apply a one-shot regulator decision; `Ok(None)` when the
    /// surrogate id misses.
    pub fn decide_batch(
        &self,
        id: &RecordId,
        status: BatchStatus,
        notes: Option<&str>,
    ) -> Result<Option<BatchRecord>, SdkError> {
        Ok(self.registry.update_batch_status(id, status, notes)?)
    }

    pub fn batch_by_id(&self, id: &RecordId) -> Result<Option<BatchRecord>, SdkError> {
        Ok(self.registry.batch_by_id(id)?)
    }

    pub fn batch_by_batch_id(&self, batch_id: &str) -> Result<Option<BatchRecord>, SdkError> {
        Ok(self.registry.batch_by_batch_id(batch_id)?)
    }

    pub fn all_batches(&self) -> Result<Vec<BatchRecord>, SdkError> {
        Ok(self.registry.all_batches()?)
    }

    pub fn batches_by_laboratory(
        &self,
        laboratory_id: &str,
    ) -> Result<Vec<BatchRecord>, SdkError> {
        Ok(self.registry.batches_by_laboratory(laboratory_id)?)
    }

    pub fn audit_logs(&self, batch_id: Option<&str>) -> Result<Vec<AuditLogEntry>, SdkError> {
        Ok(self.registry.audit_logs(batch_id)?)
    }

    // ---- Ledger pass-through ----

    pub fn chain(&self) -> Result<Vec<Block>, SdkError> {
        Ok(self.ledger.chain()?)
    }

    pub fn validate_chain(&self) -> Result<bool, SdkError> {
        Ok(self.ledger.is_valid()?)
    }

    pub fn ledger_stats(&self) -> Result<LedgerStats, SdkError> {
        Ok(self.ledger.stats()?)
    }

    // ---- Cross-system flows ----

    /// Verify a batch by business key.
    ///
    /// `Ok(None)` when the batch id misses. Otherwise mines one
    /// `BATCH_VERIFIED` transaction carrying the batch id and its status
    /// at verification time, and reports the chain's health alongside
    /// the batch summary. Verification does not touch the registry's
    /// audit trail.
    pub fn verify_batch(&self, batch_id: &str) -> Result<Option<VerificationReport>, SdkError> {
        let Some(batch) = self.registry.batch_by_batch_id(batch_id)? else {
            return Ok(None);
        };

        let transaction = self.ledger.add_transaction(
            ACTION_BATCH_VERIFIED,
            json!({
                "batch_id": batch.batch_id,
                "verified_at": Utc::now(),
                "status": batch.status,
            }),
            VERIFICATION_ACTOR,
        )?;

        info!(batch_id = %batch.batch_id, tx = %transaction.id, "batch verified");

        let stats = self.ledger.stats()?;
        Ok(Some(VerificationReport {
            batch: BatchSummary::from(&batch),
            transaction,
            chain_valid: stats.is_valid,
            last_block_hash: stats.last_block_hash,
        }))
    }

    /// The merged audit view: registry entries plus ledger transactions,
    /// optionally filtered by batch id, newest first, truncated to
    /// `limit` rows. `total` reports the pre-limit count.
    pub fn combined_audit(
        &self,
        batch_id: Option<&str>,
        limit: usize,
    ) -> Result<CombinedAudit, SdkError> {
        let mut entries: Vec<CombinedAuditEntry> = Vec::new();

        for log in self.registry.audit_logs(batch_id)? {
            entries.push(CombinedAuditEntry {
                id: log.id.to_string(),
                source: AuditSource::Registry,
                action: log.action,
                details: log.details,
                performed_by: log.performed_by,
                performed_at: log.performed_at,
                batch_id: Some(log.batch_id),
                hash: None,
                signature: None,
            });
        }

        let chain = self.ledger.chain()?;
        for tx in chain.iter().flat_map(|block| block.transactions.iter()) {
            let tx_batch_id = tx
                .payload
                .get("batch_id")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            if let Some(filter) = batch_id {
                if tx_batch_id.as_deref() != Some(filter) {
                    continue;
                }
            }

            let performed_by = tx
                .payload
                .get("performed_by")
                .and_then(|v| v.as_str())
                .unwrap_or("System")
                .to_string();

            entries.push(CombinedAuditEntry {
                id: tx.id.to_string(),
                source: AuditSource::Ledger,
                action: tx.action.clone(),
                details: tx.payload.to_string(),
                performed_by,
                performed_at: tx.timestamp,
                batch_id: tx_batch_id,
                hash: Some(tx.hash),
                signature: Some(tx.signature),
            });
        }

        entries.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        let total = entries.len() as u64;
        entries.truncate(limit);

        Ok(CombinedAudit {
            entries,
            total,
            chain_valid: self.ledger.is_valid()?,
        })
    }

    /// Counts for the operator dashboard.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, SdkError> {
        let batches = self.registry.all_batches()?;

        let mut counts = StatusCounts {
            total: batches.len() as u64,
            ..StatusCounts::default()
        };
        let mut laboratories: HashSet<&str> = HashSet::new();
        let mut active: HashSet<&str> = HashSet::new();

        for batch in &batches {
            match batch.status {
                BatchStatus::Pending => counts.pending += 1,
                BatchStatus::Approved => counts.approved += 1,
                BatchStatus::Rejected => counts.rejected += 1,
                BatchStatus::Recalled => counts.recalled += 1,
                BatchStatus::Blocked => counts.blocked += 1,
            }
            laboratories.insert(&batch.laboratory_id);
            if batch.status == BatchStatus::Approved {
                active.insert(&batch.laboratory_id);
            }
        }

        Ok(DashboardStats {
            ledger: self.ledger.stats()?,
            batches: counts,
            laboratories: LaboratoryCounts {
                total: laboratories.len() as u64,
                active: active.len() as u64,
            },
        })
    }
}

impl Default for BatchTracker {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
