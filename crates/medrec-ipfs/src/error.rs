//! Storage network client error types.

/// Errors from content-addressed storage API calls.
#[derive(Debug, thiserror::Error)]
pub enum IpfsError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The storage API returned a non-2xx status.
    #[error("storage API {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The add response could not be parsed (empty body or malformed
    /// newline-delimited JSON).
    #[error("failed to parse add response from {endpoint}: {reason}")]
    Response { endpoint: String, reason: String },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
