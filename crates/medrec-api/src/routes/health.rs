//! Health probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the health router. Probes are unauthenticated.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

async fn liveness() -> &'static str {
    "ok"
}

/// Readiness reflects storage-node reachability: an instance that cannot
/// reach the node can neither anchor nor verify.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    if state.ipfs.check_connection().await {
        Ok("ready")
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
