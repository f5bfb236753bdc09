//! # Anchor Record
//!
//! The unit persisted in the external ledger: the tuple binding a patient
//! identity to a content address, an independently computed integrity
//! digest, and an access-control list. Records are immutable after
//! creation; the ledger is append-only from this system's point of view.

use serde::{Deserialize, Serialize};

use crate::access::AccessControlList;
use crate::error::ValidationError;

/// Largest integer magnitude exactly representable in an IEEE-754 double
/// (2^53). Timestamps beyond this cannot be narrowed without precision loss.
pub const MAX_SAFE_F64_INT: i64 = 1 << 53;

/// An anchor persisted in the ledger.
///
/// `timestamp` is ledger-assigned at write time (nanoseconds since the Unix
/// epoch) and read-only from the caller's perspective; records built on the
/// write path carry `timestamp = 0` until the ledger assigns the real value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    /// External identity of the record owner. Non-empty; a patient may own
    /// many anchors.
    pub patient_id: String,
    /// Content-derived identifier assigned by the storage network. Opaque,
    /// non-empty.
    pub content_address: String,
    /// Hex-encoded SHA-256 of the uploaded bytes.
    pub integrity_digest: String,
    /// Identities permitted to read this record. Never empty after
    /// normalization.
    pub access_control: AccessControlList,
    /// Ledger-assigned write timestamp. Carried as a full-width i64
    /// end-to-end; never silently narrowed.
    pub timestamp: i64,
}

impl AnchorRecord {
    /// Build a write-path candidate record. The ledger assigns the real
    /// timestamp; `0` is a placeholder that never reaches readers.
    pub fn candidate(
        patient_id: impl Into<String>,
        content_address: impl Into<String>,
        integrity_digest: impl Into<String>,
        access_control: AccessControlList,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            content_address: content_address.into(),
            integrity_digest: integrity_digest.into(),
            access_control,
            timestamp: 0,
        }
    }

    /// Structural validation: all required fields present and non-empty.
    ///
    /// Runs on the write path before any ledger call is attempted, so a
    /// malformed candidate never reaches the remote service.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_id.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "patient_id" });
        }
        if self.content_address.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "content_address",
            });
        }
        if self.integrity_digest.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "integrity_digest",
            });
        }
        if self.access_control.is_empty() {
            return Err(ValidationError::MissingField {
                field: "access_control",
            });
        }
        Ok(())
    }

    /// Narrow the timestamp to an f64, or `None` when the value lies
    /// outside ±2^53 and the conversion would lose precision.
    ///
    /// The stack itself never narrows; this exists for consumers that must
    /// hand the value to an IEEE-754-only host.
    pub fn timestamp_f64(&self) -> Option<f64> {
        match self.timestamp.checked_abs() {
            Some(magnitude) if magnitude <= MAX_SAFE_F64_INT => Some(self.timestamp as f64),
            _ => None,
        }
    }
}
