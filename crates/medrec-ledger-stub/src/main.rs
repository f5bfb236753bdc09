//! Standalone ledger stub server.
//!
//! Speaks the same wire API as the real ledger canister so the rest of the
//! stack can run locally without a replica. Data is in-memory only.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use medrec_ledger_stub::{router, StubState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("MEDREC_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(4943);

    let app = router(StubState::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("medrec-ledger-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
