//! Ledger client error types.

/// Errors from ledger canister calls.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger endpoint is unreachable (transport failure, timeout, or
    /// the dev trust bootstrap could not fetch the root key).
    #[error("ledger unreachable at {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    /// The ledger returned an application-level fault.
    #[error("ledger {endpoint} returned {status}: {body}")]
    Remote {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The ledger holds no records for this patient. The query service
    /// normalizes this into a successful empty result; it is a distinct
    /// variant precisely so that normalization never has to match on
    /// message text.
    #[error("no records found for patient {patient_id}")]
    NoRecords { patient_id: String },

    /// A ledger reply did not conform to the declared record shape.
    #[error("failed to deserialize reply from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
