//! Write-path orchestration: validate, upload, digest, anchor.

use std::sync::Arc;

use medrec_core::{sha256_hex, AccessControlList, AnchorRecord, ValidationError};
use medrec_ipfs::{IpfsClient, IpfsError};
use medrec_ledger::LedgerClient;

/// Policy knobs for the anchor service.
#[derive(Debug, Clone, Default)]
pub struct AnchorPolicy {
    /// Identity substituted when the caller supplies no patient id.
    ///
    /// Every use is logged at `warn`. When unset, a missing patient id is
    /// a validation error — there is no silent built-in default.
    pub fallback_patient_id: Option<String>,
}

/// Whether the ledger half of an anchor operation happened.
///
/// Kept separate from the storage result so the two are never conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorStatus {
    /// The ledger accepted the anchor record under this record id.
    Recorded { record_id: u64 },
    /// Ledger anchoring is disabled by configuration; only storage ran.
    Skipped,
    /// The ledger write failed after a successful upload. Carries the
    /// diagnostic detail; the object remains retrievable by content
    /// address and the anchor can be re-driven via
    /// [`RecordAnchorService::anchor_existing`].
    Failed(String),
}

impl AnchorStatus {
    /// True only when the ledger actually holds the anchor.
    pub fn recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }

    /// The ledger-assigned record id, when the anchor was recorded.
    pub fn record_id(&self) -> Option<u64> {
        match self {
            Self::Recorded { record_id } => Some(*record_id),
            _ => None,
        }
    }

    /// Diagnostic detail for the failed case.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Failed(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Joint result of one anchor operation: the storage half always succeeded
/// (otherwise the operation errored), the ledger half is reported
/// independently.
#[derive(Debug, Clone)]
pub struct AnchorOutcome {
    /// Patient identity the anchor was recorded under (after fallback).
    pub patient_id: String,
    /// Content address assigned by the storage network.
    pub content_address: String,
    /// Original filename, echoed back to the caller.
    pub file_name: String,
    /// Object size in bytes as declared by the storage network.
    pub size: u64,
    /// Resolvable gateway URL for the stored object.
    pub gateway_url: String,
    /// Hex-encoded integrity digest of the uploaded bytes.
    pub integrity_digest: String,
    /// Access-control list as persisted (or attempted).
    pub access_control: AccessControlList,
    /// Outcome of the ledger half.
    pub anchor: AnchorStatus,
}

/// Errors that fail an anchor operation outright.
///
/// A ledger failure after a successful upload is deliberately absent: it
/// downgrades the [`AnchorOutcome`] instead of erroring.
#[derive(Debug, thiserror::Error)]
pub enum AnchorError {
    /// Caller input malformed. Raised before any external call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The content-addressed upload failed. Fatal: no partial state
    /// exists anywhere, the whole operation is safe to retry.
    #[error("storage upload failed: {0}")]
    Storage(#[from] IpfsError),

    /// A direct ledger write (the retry half) failed. Only produced by
    /// [`RecordAnchorService::anchor_existing`], never by `anchor`.
    #[error("ledger write failed: {0}")]
    Ledger(#[from] medrec_ledger::LedgerError),

    /// Ledger anchoring was requested but no ledger client is configured.
    #[error("ledger anchoring is not enabled")]
    LedgerDisabled,

    /// A runtime task failed (blocking-pool join error).
    #[error("internal task failure: {0}")]
    Internal(String),
}

/// Orchestrator for the upload-then-anchor write path.
#[derive(Debug, Clone)]
pub struct RecordAnchorService {
    ipfs: Arc<IpfsClient>,
    ledger: Option<Arc<LedgerClient>>,
    policy: AnchorPolicy,
}

impl RecordAnchorService {
    /// Build the service. `ledger: None` disables the anchoring step
    /// (storage-only mode).
    pub fn new(
        ipfs: Arc<IpfsClient>,
        ledger: Option<Arc<LedgerClient>>,
        policy: AnchorPolicy,
    ) -> Self {
        Self {
            ipfs,
            ledger,
            policy,
        }
    }

    /// Whether a ledger client is configured.
    pub fn ledger_enabled(&self) -> bool {
        self.ledger.is_some()
    }

    /// Resolve the effective patient identity, applying the configured
    /// fallback when the caller supplied none.
    fn resolve_patient_id(&self, patient_id: Option<&str>) -> Result<String, ValidationError> {
        match patient_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => Ok(id.to_string()),
            None => match &self.policy.fallback_patient_id {
                Some(fallback) => {
                    tracing::warn!(
                        fallback_patient_id = %fallback,
                        "no patient id supplied, using configured fallback identity"
                    );
                    Ok(fallback.clone())
                }
                None => Err(ValidationError::MissingPatientId),
            },
        }
    }

    /// Anchor a payload: upload, digest, ledger write.
    ///
    /// Stages, in order:
    ///
    /// 1. Validate the payload and resolve the patient identity.
    /// 2. Normalize the access-control input.
    /// 3. Upload with pinning. Failure here aborts the operation.
    /// 4. Compute the integrity digest over the same in-memory bytes that
    ///    were uploaded — never over a re-fetched copy.
    /// 5. Structurally validate the candidate record before any ledger
    ///    call.
    /// 6. Attempt the ledger write in isolation: failure downgrades the
    ///    outcome to `AnchorStatus::Failed`, it never fails the call.
    pub async fn anchor(
        &self,
        patient_id: Option<&str>,
        bytes: Vec<u8>,
        file_name: &str,
        access_control: Option<&str>,
    ) -> Result<AnchorOutcome, AnchorError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyPayload.into());
        }
        let patient_id = self.resolve_patient_id(patient_id)?;
        let acl = AccessControlList::normalize(access_control, &patient_id);

        // The digest input must be the exact uploaded bytes, so keep one
        // copy for hashing while the upload consumes the other.
        let digest_input = bytes.clone();
        let added = self.ipfs.add(bytes, file_name).await?;

        // CPU-bound over possibly large payloads; hand it to the blocking
        // pool so it cannot stall the cooperative runtime.
        let integrity_digest = tokio::task::spawn_blocking(move || sha256_hex(&digest_input))
            .await
            .map_err(|e| AnchorError::Internal(format!("digest task failed: {e}")))?;

        let candidate = AnchorRecord::candidate(
            patient_id.clone(),
            added.hash.clone(),
            integrity_digest.clone(),
            acl.clone(),
        );
        candidate.validate()?;

        let anchor = match &self.ledger {
            None => AnchorStatus::Skipped,
            Some(ledger) => {
                match ledger
                    .store_record(&patient_id, &added.hash, &integrity_digest, &acl)
                    .await
                {
                    Ok(reply) => AnchorStatus::Recorded {
                        record_id: reply.record_id,
                    },
                    Err(e) => {
                        // Isolated by design: the object is stored and
                        // retrievable, only the anchor is missing.
                        tracing::warn!(
                            patient_id = %patient_id,
                            cid = %added.hash,
                            error = %e,
                            "ledger anchoring failed after successful upload"
                        );
                        AnchorStatus::Failed(format!(
                            "file stored at {} but ledger anchoring failed: {e}",
                            added.hash
                        ))
                    }
                }
            }
        };

        Ok(AnchorOutcome {
            patient_id,
            gateway_url: self.ipfs.gateway_url(&added.hash),
            content_address: added.hash,
            file_name: file_name.to_string(),
            size: added.size,
            integrity_digest,
            access_control: acl,
            anchor,
        })
    }

    /// Re-drive only the ledger half for an object that is already stored,
    /// returning the ledger-assigned record id.
    ///
    /// This is the retry path for a partial failure: the caller supplies
    /// the content address and digest from the original outcome, and no
    /// re-upload happens.
    pub async fn anchor_existing(
        &self,
        patient_id: &str,
        content_address: &str,
        integrity_digest: &str,
        access_control: &AccessControlList,
    ) -> Result<u64, AnchorError> {
        let candidate = AnchorRecord::candidate(
            patient_id,
            content_address,
            integrity_digest,
            access_control.clone(),
        );
        candidate.validate()?;

        let ledger = self.ledger.as_ref().ok_or(AnchorError::LedgerDisabled)?;

        let reply = ledger
            .store_record(patient_id, content_address, integrity_digest, access_control)
            .await?;
        Ok(reply.record_id)
    }
}
