//! Wire types for the ledger canister interface.
//!
//! This module is the single declaration of the record shape
//! (`patientId: text, contentAddress: text, timestamp: int, integrityDigest:
//! text, accessControl: vec text`). The client's read and write paths and
//! the development stub all marshal through these types.
//!
//! The ledger-assigned timestamp is a wide integer; on the wire it travels
//! as a decimal string so that non-Rust consumers never round it through an
//! IEEE-754 double. In memory it is a full-width `i64`.

use medrec_core::{AccessControlList, AnchorRecord};
use serde::{Deserialize, Serialize};

/// An anchor record as marshalled across the RPC boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub patient_id: String,
    pub content_address: String,
    /// Nanoseconds since the Unix epoch, ledger-assigned. Decimal string
    /// on the wire.
    #[serde(with = "timestamp_string")]
    pub timestamp: i64,
    pub integrity_digest: String,
    pub access_control: Vec<String>,
}

impl From<LedgerRecord> for AnchorRecord {
    fn from(r: LedgerRecord) -> Self {
        AnchorRecord {
            patient_id: r.patient_id,
            content_address: r.content_address,
            integrity_digest: r.integrity_digest,
            access_control: AccessControlList::from_entries(r.access_control),
            timestamp: r.timestamp,
        }
    }
}

/// Arguments for the `storeRecord` update call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecordArgs {
    pub patient_id: String,
    pub content_address: String,
    pub integrity_digest: String,
    pub access_control: Vec<String>,
}

/// Reply for the `storeRecord` update call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecordReply {
    /// Ledger-assigned sequence number of the stored anchor.
    pub record_id: u64,
}

/// Arguments for the `getRecords` query call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordsArgs {
    pub patient_id: String,
}

/// Reply envelope for the `getRecords` query call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRecordsReply {
    pub records: Vec<LedgerRecord>,
}

/// Application-fault body returned by the ledger for non-2xx replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultBody {
    /// Machine-readable fault code (e.g. `NO_RECORDS`).
    pub code: String,
    pub message: String,
}

/// Fault code the ledger uses for an empty `getRecords` result.
pub const FAULT_NO_RECORDS: &str = "NO_RECORDS";

/// Status reply carrying the replica root key (dev bootstrap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    /// Hex-encoded replica root public key.
    pub root_key: String,
}

/// Serialize an i64 as a decimal string and parse it back strictly.
mod timestamp_string {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse::<i64>().map_err(serde::de::Error::custom)
    }
}
