//! In-memory append-only record store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use medrec_ledger::wire::{LedgerRecord, StoreRecordArgs};

/// Shared stub state: records keyed by patient id, append-only.
#[derive(Debug, Clone, Default)]
pub struct StubState {
    records: Arc<DashMap<String, Vec<LedgerRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl StubState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning the record id and write timestamp the
    /// way the real ledger does. Duplicate submissions create duplicate
    /// anchors, each with its own id.
    pub fn append(&self, args: StoreRecordArgs) -> (u64, LedgerRecord) {
        let record_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = LedgerRecord {
            patient_id: args.patient_id.clone(),
            content_address: args.content_address,
            timestamp: now_nanos(),
            integrity_digest: args.integrity_digest,
            access_control: args.access_control,
        };
        self.records
            .entry(args.patient_id)
            .or_default()
            .push(record.clone());
        (record_id, record)
    }

    /// All records for a patient, in append order. `None` when the patient
    /// has no records at all.
    pub fn records_for(&self, patient_id: &str) -> Option<Vec<LedgerRecord>> {
        self.records
            .get(patient_id)
            .filter(|r| !r.value().is_empty())
            .map(|r| r.value().clone())
    }
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> StoreRecordArgs {
        StoreRecordArgs {
            patient_id: "p1".into(),
            content_address: "QmAbc".into(),
            integrity_digest: "d".repeat(64),
            access_control: vec!["p1".into()],
        }
    }

    #[test]
    fn append_assigns_id_and_timestamp() {
        let state = StubState::new();
        let (record_id, record) = state.append(args());
        assert_eq!(record_id, 1);
        assert!(record.timestamp > 0);
    }

    #[test]
    fn duplicate_appends_create_two_anchors_with_distinct_ids() {
        let state = StubState::new();
        let (first, _) = state.append(args());
        let (second, _) = state.append(args());
        assert_ne!(first, second);
        assert_eq!(state.records_for("p1").unwrap().len(), 2);
    }

    #[test]
    fn unknown_patient_has_no_records() {
        let state = StubState::new();
        assert!(state.records_for("nobody").is_none());
    }
}
