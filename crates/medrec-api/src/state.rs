//! Application configuration and shared state.

use std::sync::Arc;

use medrec_anchor::{AnchorPolicy, RecordAnchorService, RecordQueryService};
use medrec_ipfs::{IpfsClient, IpfsConfig, IpfsError};
use medrec_ledger::{Environment, LedgerClient, LedgerConfig, LedgerError};

/// Environment-derived configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port (`MEDREC_PORT`, default 3001).
    pub port: u16,
    /// Storage node API base URL (`MEDREC_IPFS_API_URL`).
    pub ipfs_api_url: String,
    /// Storage gateway base URL (`MEDREC_IPFS_GATEWAY_URL`).
    pub ipfs_gateway_url: String,
    /// Ledger host (`MEDREC_LEDGER_HOST`).
    pub ledger_host: String,
    /// Ledger canister identifier (`MEDREC_LEDGER_CANISTER_ID`).
    pub ledger_canister_id: String,
    /// Whether the ledger anchoring step runs at all
    /// (`MEDREC_LEDGER_ENABLED`, default true).
    pub ledger_enabled: bool,
    /// Deployment environment (`MEDREC_ENV`), governs the ledger trust
    /// bootstrap.
    pub env: Environment,
    /// Fallback identity for uploads with no patient id
    /// (`MEDREC_FALLBACK_PATIENT_ID`, unset means reject).
    pub fallback_patient_id: Option<String>,
}

impl AppConfig {
    /// Read configuration from the environment, with local-development
    /// defaults matching a standard node and replica.
    pub fn from_env() -> Self {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        Self {
            port: var("MEDREC_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3001),
            ipfs_api_url: var("MEDREC_IPFS_API_URL")
                .unwrap_or_else(|| "http://localhost:5001/api/v0".into()),
            ipfs_gateway_url: var("MEDREC_IPFS_GATEWAY_URL")
                .unwrap_or_else(|| "http://localhost:8080/ipfs".into()),
            ledger_host: var("MEDREC_LEDGER_HOST")
                .unwrap_or_else(|| "http://localhost:4943".into()),
            ledger_canister_id: var("MEDREC_LEDGER_CANISTER_ID").unwrap_or_default(),
            ledger_enabled: var("MEDREC_LEDGER_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            env: Environment::parse(&var("MEDREC_ENV").unwrap_or_default()),
            fallback_patient_id: var("MEDREC_FALLBACK_PATIENT_ID"),
        }
    }
}

/// Errors building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("storage client: {0}")]
    Ipfs(#[from] IpfsError),
    #[error("ledger client: {0}")]
    Ledger(#[from] LedgerError),
}

/// Shared state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ipfs: Arc<IpfsClient>,
    pub anchor_service: RecordAnchorService,
    /// Present only when the ledger is enabled; the query endpoint
    /// returns 503 without it.
    pub query_service: Option<RecordQueryService>,
}

impl AppState {
    /// Build clients and services from configuration. Connecting to the
    /// ledger performs the environment-appropriate trust bootstrap, so an
    /// unreachable development replica fails here, at startup.
    pub async fn build(config: &AppConfig) -> Result<Self, StateError> {
        let ipfs = Arc::new(IpfsClient::new(IpfsConfig::new(
            config.ipfs_api_url.clone(),
            config.ipfs_gateway_url.clone(),
        ))?);

        let ledger = if config.ledger_enabled {
            let ledger = LedgerClient::connect(LedgerConfig::new(
                config.ledger_host.clone(),
                config.ledger_canister_id.clone(),
                config.env,
            ))
            .await?;
            Some(Arc::new(ledger))
        } else {
            tracing::info!("ledger anchoring disabled, running in storage-only mode");
            None
        };

        let policy = AnchorPolicy {
            fallback_patient_id: config.fallback_patient_id.clone(),
        };

        Ok(Self {
            anchor_service: RecordAnchorService::new(ipfs.clone(), ledger.clone(), policy),
            query_service: ledger.map(|l| RecordQueryService::new(l, ipfs.clone())),
            ipfs,
        })
    }
}
