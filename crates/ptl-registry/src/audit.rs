use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ptl_types::EntryId;

use crate::error::RegistryError;

/// One row in the audit trail.
///
/// Related to a batch record only by `batch_id`, a weak back reference,
/// not ownership. Entries outlive any view of the batch and are never
/// mutated after append.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: EntryId,
    pub batch_id: String,
    pub action: String,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub details: String,
}

/// Process-wide, append-only action trail.
///
/// The secondary, human-readable record that lets an operator reconstruct
/// what happened even when the registry and the ledger diverge. Any
/// component may append; no API exists to remove or edit an entry.
pub struct AuditTrail {
    inner: RwLock<Vec<AuditLogEntry>>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Append an entry and return it.
    pub fn append(
        &self,
        batch_id: &str,
        action: &str,
        performed_by: &str,
        details: String,
    ) -> Result<AuditLogEntry, RegistryError> {
        let entry = AuditLogEntry {
            id: EntryId::new(),
            batch_id: batch_id.to_string(),
            action: action.to_string(),
            performed_by: performed_by.to_string(),
            performed_at: Utc::now(),
            details,
        };

        let mut entries = self
            .inner
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        entries.push(entry.clone());
        Ok(entry)
    }

    /// All entries in append order, optionally filtered by batch id.
    pub fn entries(&self, batch_id: Option<&str>) -> Result<Vec<AuditLogEntry>, RegistryError> {
        let entries = self
            .inner
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(match batch_id {
            Some(id) => entries.iter().filter(|e| e.batch_id == id).cloned().collect(),
            None => entries.clone(),
        })
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
