use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde_json::json;
use tracing::info;

use ptl_ledger::LedgerWriter;
use ptl_types::{BatchStatus, RecordId};

use crate::audit::{AuditLogEntry, AuditTrail};
use crate::batch::{BatchDraft, BatchRecord};
use crate::error::RegistryError;

/// Ledger action tag written when a batch is registered.
pub const ACTION_BATCH_CREATED: &str = "BATCH_CREATED";
/// Audit action label for batch registration.
pub const AUDIT_BATCH_CREATED: &str = "Batch Created";
/// Audit action label for a regulator decision.
pub const AUDIT_STATUS_UPDATED: &str = "Status Updated";

/// The batch entity store and its status state machine.
///
/// Keyed by surrogate id; the business key (`batch_id`) is enforced
/// unique across all records. Reads take a snapshot under the read lock;
/// writes are serialized. Records are never deleted.
///
/// Each mutation runs as independent, individually atomic steps: the
/// registry map first, then the ledger transaction (creation only), then
/// the audit entry. A failure in a later step does not roll back an
/// earlier one: the stores share only batch ids and timestamps, and
/// divergence between them is observable.
pub struct BatchRegistry<L: LedgerWriter> {
    ledger: Arc<L>,
    batches: RwLock<HashMap<RecordId, BatchRecord>>,
    audit: AuditTrail,
}

impl<L: LedgerWriter> BatchRegistry<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            batches: RwLock::new(HashMap::new()),
            audit: AuditTrail::new(),
        }
    }

    /// Register a new batch.
    ///
    /// Rejects a duplicate business key. The record always enters as
    /// `Pending` with empty certificate and distribution lists, and is
    /// assigned a random display placeholder hash, unrelated to the hash
    /// of the `BATCH_CREATED` ledger transaction this call also mines.
    pub fn create_batch(&self, draft: BatchDraft) -> Result<BatchRecord, RegistryError> {
        let record = {
            let mut batches = self
                .batches
                .write()
                .map_err(|_| RegistryError::LockPoisoned)?;

            if batches.values().any(|b| b.batch_id == draft.batch_id) {
                return Err(RegistryError::DuplicateBatchId(draft.batch_id));
            }

            let now = Utc::now();
            let record = BatchRecord {
                id: RecordId::new(),
                batch_id: draft.batch_id,
                product_name: draft.product_name,
                formula: draft.formula,
                laboratory_id: draft.laboratory_id,
                laboratory_name: draft.laboratory_name,
                production_date: draft.production_date,
                expiry_date: draft.expiry_date,
                quantity: draft.quantity,
                unit: draft.unit,
                status: BatchStatus::Pending,
                quality_certificates: Vec::new(),
                distribution_log: Vec::new(),
                blockchain_hash: placeholder_hash(),
                regulator_notes: None,
                created_at: now,
                updated_at: now,
            };
            batches.insert(record.id, record.clone());
            record
        };

        info!(batch_id = %record.batch_id, id = %record.id.short_id(), "batch registered");

        // Mining happens outside the batch lock. If it fails the registry
        // insert stands; the stores reconcile only by batch id.
        self.ledger.record(
            ACTION_BATCH_CREATED,
            json!({
                "batch_id": record.batch_id,
                "product_name": record.product_name,
                "laboratory_id": record.laboratory_id,
            }),
            &record.laboratory_name,
        )?;

        self.audit.append(
            &record.batch_id,
            AUDIT_BATCH_CREATED,
            &record.laboratory_name,
            format!(
                "New batch {} created for {}",
                record.batch_id, record.product_name
            ),
        )?;

        Ok(record)
    }

    /// Apply a regulator decision to a pending batch.
    ///
    /// `Ok(None)` when the surrogate id misses. The decision is one-shot:
    /// a batch that has already left `Pending` is rejected with
    /// `AlreadyDecided`. Does NOT write a ledger transaction; only
    /// creation and the verification flow touch the chain.
    pub fn update_batch_status(
        &self,
        id: &RecordId,
        status: BatchStatus,
        notes: Option<&str>,
    ) -> Result<Option<BatchRecord>, RegistryError> {
        let updated = {
            let mut batches = self
                .batches
                .write()
                .map_err(|_| RegistryError::LockPoisoned)?;

            let Some(record) = batches.get_mut(id) else {
                return Ok(None);
            };

            if record.status.is_decided() {
                return Err(RegistryError::AlreadyDecided {
                    batch_id: record.batch_id.clone(),
                    status: record.status,
                });
            }
            if !record.status.can_transition_to(status) {
                return Err(RegistryError::InvalidTransition {
                    from: record.status,
                    to: status,
                });
            }

            record.status = status;
            record.updated_at = Utc::now();
            if let Some(notes) = notes {
                record.regulator_notes = Some(notes.to_string());
            }
            record.clone()
        };

        info!(batch_id = %updated.batch_id, status = %status, "batch decided");

        let details = match notes {
            Some(notes) => format!("Status changed to {status}: {notes}"),
            None => format!("Status changed to {status}"),
        };
        self.audit
            .append(&updated.batch_id, AUDIT_STATUS_UPDATED, "System", details)?;

        Ok(Some(updated))
    }

    /// Lookup by surrogate key.
    pub fn batch_by_id(&self, id: &RecordId) -> Result<Option<BatchRecord>, RegistryError> {
        let batches = self
            .batches
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(batches.get(id).cloned())
    }

    /// Lookup by business key.
    pub fn batch_by_batch_id(&self, batch_id: &str) -> Result<Option<BatchRecord>, RegistryError> {
        let batches = self
            .batches
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(batches.values().find(|b| b.batch_id == batch_id).cloned())
    }

    /// All records, oldest first. Full scan; any limit is the caller's.
    pub fn all_batches(&self) -> Result<Vec<BatchRecord>, RegistryError> {
        let batches = self
            .batches
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        let mut records: Vec<_> = batches.values().cloned().collect();
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(records)
    }

    /// Records produced by one laboratory, oldest first.
    pub fn batches_by_laboratory(
        &self,
        laboratory_id: &str,
    ) -> Result<Vec<BatchRecord>, RegistryError> {
        let mut records = self.all_batches()?;
        records.retain(|b| b.laboratory_id == laboratory_id);
        Ok(records)
    }

    /// Records currently in the given status, oldest first.
    pub fn batches_by_status(
        &self,
        status: BatchStatus,
    ) -> Result<Vec<BatchRecord>, RegistryError> {
        let mut records = self.all_batches()?;
        records.retain(|b| b.status == status);
        Ok(records)
    }

    /// Audit entries, optionally filtered by batch id.
    pub fn audit_logs(&self, batch_id: Option<&str>) -> Result<Vec<AuditLogEntry>, RegistryError> {
        self.audit.entries(batch_id)
    }
}

/// Random 20-byte display placeholder in `0x…` form. Purely cosmetic;
/// carries no relation to any chain hash.
fn placeholder_hash() -> String {
    let bytes: [u8; 20] = rand::random();
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use ptl_ledger::{InMemoryLedger, LedgerError};

    use super::*;

    fn draft(batch_id: &str) -> BatchDraft {
        BatchDraft {
            batch_id: batch_id.into(),
            product_name: "Amoxicillin 500mg".into(),
            formula: "C16H19N3O5S".into(),
            laboratory_id: "lab-001".into(),
            laboratory_name: "PharmaTech Labs".into(),
            production_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            expiry_date: Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
            quantity: 10_000,
            unit: "tablets".into(),
        }
    }

    fn registry() -> (Arc<InMemoryLedger>, BatchRegistry<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::default());
        let registry = BatchRegistry::new(Arc::clone(&ledger));
        (ledger, registry)
    }

    #[test]
    fn create_batch_enters_pending_with_empty_sub_records() {
        let (_, registry) = registry();
        let record = registry.create_batch(draft("PT-2024-001")).unwrap();

        assert_eq!(record.status, BatchStatus::Pending);
        assert!(record.quality_certificates.is_empty());
        assert!(record.distribution_log.is_empty());
        assert!(record.regulator_notes.is_none());
        assert_eq!(record.created_at, record.updated_at);
        assert!(record.blockchain_hash.starts_with("0x"));
        assert_eq!(record.blockchain_hash.len(), 42);
    }

    #[test]
    fn create_batch_writes_one_ledger_transaction_and_one_audit_entry() {
        let (ledger, registry) = registry();
        let record = registry.create_batch(draft("PT-2024-001")).unwrap();

        let chain = ledger.chain().unwrap();
        assert_eq!(chain.len(), 2);
        let tx = &chain[1].transactions[0];
        assert_eq!(tx.action, ACTION_BATCH_CREATED);
        assert_eq!(
            tx.payload.get("batch_id").and_then(|v| v.as_str()),
            Some("PT-2024-001")
        );
        assert_eq!(
            tx.payload.get("performed_by").and_then(|v| v.as_str()),
            Some("PharmaTech Labs")
        );
        assert!(ledger.is_valid().unwrap());

        let audit = registry.audit_logs(Some("PT-2024-001")).unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AUDIT_BATCH_CREATED);
        assert_eq!(audit[0].performed_by, "PharmaTech Labs");
        assert!(audit[0].details.contains(&record.product_name));
    }

    #[test]
    fn duplicate_batch_id_is_rejected() {
        let (ledger, registry) = registry();
        registry.create_batch(draft("PT-2024-001")).unwrap();

        let err = registry.create_batch(draft("PT-2024-001")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateBatchId("PT-2024-001".into())
        );
        // The rejected call left no trace in either store.
        assert_eq!(ledger.chain().unwrap().len(), 2);
        assert_eq!(registry.all_batches().unwrap().len(), 1);
    }

    #[test]
    fn ledger_failure_surfaces_but_registry_insert_stands() {
        let ledger = Arc::new(InMemoryLedger::new(ptl_ledger::LedgerConfig {
            difficulty: 64,
            seal_threshold: 1,
            max_seal_attempts: Some(4),
        }));
        let registry = BatchRegistry::new(Arc::clone(&ledger));

        let err = registry.create_batch(draft("PT-2024-001")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Ledger(LedgerError::EffortExhausted { attempts: 4 })
        );
        // Cross-system consistency is eventual, not atomic.
        assert!(registry
            .batch_by_batch_id("PT-2024-001")
            .unwrap()
            .is_some());
    }

    #[test]
    fn update_batch_status_decides_a_pending_batch() {
        let (ledger, registry) = registry();
        let record = registry.create_batch(draft("PT-2024-001")).unwrap();
        let blocks_before = ledger.chain().unwrap().len();

        let updated = registry
            .update_batch_status(&record.id, BatchStatus::Approved, Some("meets spec"))
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, BatchStatus::Approved);
        assert_eq!(updated.regulator_notes.as_deref(), Some("meets spec"));
        assert!(updated.updated_at > updated.created_at);

        let audit = registry.audit_logs(Some("PT-2024-001")).unwrap();
        assert_eq!(audit.len(), 2);
        assert_eq!(audit[1].action, AUDIT_STATUS_UPDATED);
        assert_eq!(audit[1].performed_by, "System");
        assert!(audit[1].details.contains("approved"));
        assert!(audit[1].details.contains("meets spec"));

        // A decision never writes to the chain.
        assert_eq!(ledger.chain().unwrap().len(), blocks_before);
    }

    #[test]
    fn update_batch_status_misses_unknown_id() {
        let (_, registry) = registry();
        let missing = registry
            .update_batch_status(&RecordId::new(), BatchStatus::Approved, None)
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn decided_batches_reject_a_second_decision() {
        let (_, registry) = registry();
        let record = registry.create_batch(draft("PT-2024-001")).unwrap();
        registry
            .update_batch_status(&record.id, BatchStatus::Rejected, Some("failed purity"))
            .unwrap();

        let err = registry
            .update_batch_status(&record.id, BatchStatus::Approved, None)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyDecided {
                batch_id: "PT-2024-001".into(),
                status: BatchStatus::Rejected,
            }
        );

        // Same-status repeats are rejected too; the audit trail records
        // only real decisions.
        let err = registry
            .update_batch_status(&record.id, BatchStatus::Rejected, None)
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyDecided { .. }));
        assert_eq!(registry.audit_logs(Some("PT-2024-001")).unwrap().len(), 2);
    }

    #[test]
    fn pending_to_pending_is_an_illegal_transition() {
        let (_, registry) = registry();
        let record = registry.create_batch(draft("PT-2024-001")).unwrap();
        let err = registry
            .update_batch_status(&record.id, BatchStatus::Pending, None)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidTransition {
                from: BatchStatus::Pending,
                to: BatchStatus::Pending,
            }
        );
    }

    #[test]
    fn lookups_by_both_keys() {
        let (_, registry) = registry();
        let record = registry.create_batch(draft("PT-2024-001")).unwrap();

        assert_eq!(
            registry.batch_by_id(&record.id).unwrap().as_ref(),
            Some(&record)
        );
        assert_eq!(
            registry.batch_by_batch_id("PT-2024-001").unwrap().as_ref(),
            Some(&record)
        );
        assert!(registry.batch_by_id(&RecordId::new()).unwrap().is_none());
        assert!(registry.batch_by_batch_id("NO-SUCH-ID").unwrap().is_none());
    }

    #[test]
    fn scans_filter_by_laboratory_and_status() {
        let (_, registry) = registry();
        let a = registry.create_batch(draft("PT-2024-001")).unwrap();
        let mut other = draft("PT-2024-002");
        other.laboratory_id = "lab-002".into();
        other.laboratory_name = "BioSur".into();
        registry.create_batch(other).unwrap();

        registry
            .update_batch_status(&a.id, BatchStatus::Approved, None)
            .unwrap();

        assert_eq!(registry.all_batches().unwrap().len(), 2);
        assert_eq!(
            registry.batches_by_laboratory("lab-001").unwrap().len(),
            1
        );
        assert!(registry
            .batches_by_laboratory("lab-999")
            .unwrap()
            .is_empty());

        let approved = registry.batches_by_status(BatchStatus::Approved).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].batch_id, "PT-2024-001");
        assert_eq!(
            registry
                .batches_by_status(BatchStatus::Pending)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn all_batches_returns_oldest_first() {
        let (_, registry) = registry();
        registry.create_batch(draft("PT-2024-001")).unwrap();
        registry.create_batch(draft("PT-2024-002")).unwrap();
        registry.create_batch(draft("PT-2024-003")).unwrap();

        let ids: Vec<_> = registry
            .all_batches()
            .unwrap()
            .into_iter()
            .map(|b| b.batch_id)
            .collect();
        assert_eq!(ids, vec!["PT-2024-001", "PT-2024-002", "PT-2024-003"]);
    }
}
