//! # medrec-api — HTTP Surface for the Medrec Stack
//!
//! Exposes the anchoring protocol over HTTP:
//!
//! | Route                     | Method       | Behavior                                  |
//! |---------------------------|--------------|-------------------------------------------|
//! | `/v1/records`             | POST (multipart) | Upload + digest + ledger anchor       |
//! | `/v1/records`             | GET          | All anchors for a patient, enriched       |
//! | `/v1/records`             | PUT/DELETE   | 405                                       |
//! | `/v1/records/anchor`      | POST (JSON)  | Ledger-half retry for a stored object     |
//! | `/health/liveness`        | GET          | Process liveness                          |
//! | `/health/readiness`       | GET          | Storage node reachability                 |
//!
//! ## Envelope Contract
//!
//! Every failure path returns the fixed shape `{success:false, error,
//! details?}`; the anchor success envelope always reports `recordStored`
//! separately from the storage result, so a client can decide to retry
//! just the anchoring step. Stack traces and internal errors never leave
//! the process — diagnostics travel only inside `details`.
//!
//! ## Crate Policy
//!
//! No business logic in route handlers — they validate the HTTP shape and
//! delegate to `medrec-anchor`.

pub mod envelope;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Upper bound for uploaded documents. Larger bodies are rejected before
/// they reach the handler.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::records::router())
        .merge(routes::health::router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
