//! Fixed response envelopes.
//!
//! The failure shape is identical on every error path: `{success:false,
//! error, details?}`. The anchor success shape always carries both the
//! storage result and `recordStored`, never conflating the two.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Success envelope for the anchoring endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorResponse {
    pub success: bool,
    pub ipfs_hash: String,
    pub file_name: String,
    pub size: u64,
    pub ipfs_url: String,
    /// Whether the ledger holds the anchor. `false` either because
    /// anchoring is disabled or because the ledger write failed — in the
    /// latter case `details` explains.
    pub record_stored: bool,
    /// Ledger-assigned record id, present only when `recordStored` is
    /// true. A string so wide ids survive non-Rust JSON consumers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canister_record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Success envelope for the query endpoint.
#[derive(Debug, Serialize)]
pub struct RecordsResponse<T: Serialize> {
    pub success: bool,
    pub records: Vec<T>,
    pub count: usize,
}

/// Failure envelope, used by every error path.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An API failure: HTTP status plus the fixed failure envelope.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
}

impl ApiFailure {
    /// 400 — caller input malformed; never reached an external system.
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details: None,
        }
    }

    /// 405 — unsupported method on a known resource.
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            error: "Method not allowed".into(),
            details: None,
        }
    }

    /// 500 — downstream failure. `details` carries the diagnostic text;
    /// `error` stays generic.
    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// 503 — a required collaborator is not configured or reachable.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.error, details = ?self.details, "request failed");
        }
        let body = FailureBody {
            success: false,
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_body_omits_absent_details() {
        let body = FailureBody {
            success: false,
            error: "No file uploaded".into(),
            details: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
        assert!(json.contains(r#""success":false"#));
    }

    #[test]
    fn anchor_response_field_names() {
        let resp = AnchorResponse {
            success: true,
            ipfs_hash: "QmAbc".into(),
            file_name: "scan.pdf".into(),
            size: 10,
            ipfs_url: "http://localhost:8080/ipfs/QmAbc".into(),
            record_stored: true,
            canister_record_id: Some("7".into()),
            details: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ipfsHash"], "QmAbc");
        assert_eq!(json["fileName"], "scan.pdf");
        assert_eq!(json["recordStored"], true);
        assert_eq!(json["canisterRecordId"], "7");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn anchor_response_omits_absent_record_id() {
        let resp = AnchorResponse {
            success: true,
            ipfs_hash: "QmAbc".into(),
            file_name: "scan.pdf".into(),
            size: 10,
            ipfs_url: "http://localhost:8080/ipfs/QmAbc".into(),
            record_stored: false,
            canister_record_id: None,
            details: Some("ledger anchoring failed".into()),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("canisterRecordId").is_none());
        assert_eq!(json["details"], "ledger anchoring failed");
    }
}
