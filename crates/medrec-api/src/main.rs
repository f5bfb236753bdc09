//! medrec-api server binary.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use medrec_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let state = match AppState::build(&config).await {
        Ok(state) => state,
        Err(e) => {
            // Startup failure: the ledger bootstrap or client construction
            // failed. Better to die loudly than serve half a stack.
            tracing::error!("failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let app = medrec_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("medrec-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
