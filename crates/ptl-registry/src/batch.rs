use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ptl_types::{BatchStatus, CertResult, DistributionStatus, EntryId, RecipientType, RecordId};

/// Result of a quality test, owned exclusively by its batch record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCertificate {
    pub id: EntryId,
    pub test_type: String,
    pub result: CertResult,
    pub test_date: DateTime<Utc>,
    pub certified_by: String,
    pub notes: Option<String>,
}

/// A single transfer of stock out of a batch, owned exclusively by its
/// batch record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub id: EntryId,
    pub recipient_type: RecipientType,
    pub recipient_id: String,
    pub recipient_name: String,
    pub location: String,
    pub transfer_date: DateTime<Utc>,
    pub quantity: u64,
    pub status: DistributionStatus,
}

/// A registered production batch.
///
/// `batch_id` is the human-assigned business key printed on labels (e.g.
/// "PT-2024-001"); `id` is the registry's surrogate key. `blockchain_hash`
/// is a display placeholder assigned at creation, distinct from the hash
/// of the ledger transaction mined for the same batch; the two are never
/// reconciled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: RecordId,
    pub batch_id: String,
    pub product_name: String,
    pub formula: String,
    pub laboratory_id: String,
    pub laboratory_name: String,
    pub production_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub quantity: u64,
    pub unit: String,
    pub status: BatchStatus,
    pub quality_certificates: Vec<QualityCertificate>,
    pub distribution_log: Vec<DistributionEntry>,
    pub blockchain_hash: String,
    pub regulator_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for batch registration. The registry assigns
/// the surrogate id, placeholder hash, status, and timestamps itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDraft {
    pub batch_id: String,
    pub product_name: String,
    pub formula: String,
    pub laboratory_id: String,
    pub laboratory_name: String,
    pub production_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub quantity: u64,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn batch_record_serde_roundtrip() {
        let record = BatchRecord {
            id: RecordId::new(),
            batch_id: "PT-2024-001".into(),
            product_name: "Amoxicillin 500mg".into(),
            formula: "C16H19N3O5S".into(),
            laboratory_id: "lab-001".into(),
            laboratory_name: "PharmaTech Labs".into(),
            production_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            expiry_date: Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
            quantity: 10_000,
            unit: "tablets".into(),
            status: BatchStatus::Pending,
            quality_certificates: vec![QualityCertificate {
                id: EntryId::new(),
                test_type: "Purity Test".into(),
                result: CertResult::Pass,
                test_date: Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
                certified_by: "Dr. Sarah Chen".into(),
                notes: Some("Purity: 99.8%".into()),
            }],
            distribution_log: vec![DistributionEntry {
                id: EntryId::new(),
                recipient_type: RecipientType::Hospital,
                recipient_id: "hosp-001".into(),
                recipient_name: "Central Medical Center".into(),
                location: "Buenos Aires, Argentina".into(),
                transfer_date: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
                quantity: 2_000,
                status: DistributionStatus::Delivered,
            }],
            blockchain_hash: "0x1a2b3c4d5e6f7890abcdef1234567890abcdef12".into(),
            regulator_notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: BatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
        assert!(record.updated_at >= record.created_at);
    }

    #[test]
    fn sub_record_statuses_use_wire_labels() {
        let json = serde_json::json!({
            "id": EntryId::new(),
            "recipient_type": "pharmacy",
            "recipient_id": "ph-01",
            "recipient_name": "City Pharmacy",
            "location": "Rosario, Argentina",
            "transfer_date": "2024-02-01T00:00:00Z",
            "quantity": 500,
            "status": "in-transit"
        });
        let entry: DistributionEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.recipient_type, RecipientType::Pharmacy);
        assert_eq!(entry.status, DistributionStatus::InTransit);
    }
}
