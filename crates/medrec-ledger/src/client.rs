//! Ledger canister HTTP client.

use std::time::Duration;

use medrec_core::AccessControlList;

use crate::error::LedgerError;
use crate::wire::{
    FaultBody, GetRecordsArgs, GetRecordsReply, LedgerRecord, StatusReply, StoreRecordArgs,
    StoreRecordReply, FAULT_NO_RECORDS,
};

/// Deployment environment, governing the trust bootstrap in
/// [`LedgerClient::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local replica: fetch the root key before any call.
    #[default]
    Development,
    /// Mainnet: the root key is known ahead of time, never fetched.
    Production,
}

impl Environment {
    /// Parse from a config string. Anything other than `production` is
    /// treated as development, matching the conservative default of never
    /// skipping the bootstrap by accident.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }
}

/// Configuration for the ledger client.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Base URL of the ledger host (e.g., `http://localhost:4943`).
    pub host: String,
    /// Identifier of the record-anchoring canister on that host.
    pub canister_id: String,
    /// Deployment environment (governs the root-key bootstrap).
    pub env: Environment,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl LedgerConfig {
    /// Create a new configuration with the default timeout.
    pub fn new(host: impl Into<String>, canister_id: impl Into<String>, env: Environment) -> Self {
        Self {
            host: host.into(),
            canister_id: canister_id.into(),
            env,
            timeout_secs: 30,
        }
    }
}

/// Typed client for the record-anchoring ledger canister.
///
/// Shared via `Arc` across async tasks; holds no mutable state after
/// [`connect`](Self::connect).
#[derive(Debug)]
pub struct LedgerClient {
    client: reqwest::Client,
    host: String,
    canister_id: String,
    /// Root key fetched during the dev bootstrap. Held for diagnostics;
    /// `None` in production, where the key is never replica-supplied.
    root_key: Option<String>,
}

impl LedgerClient {
    /// Connect to the ledger, performing the environment-appropriate trust
    /// bootstrap.
    ///
    /// In development the replica root key is fetched from the status
    /// endpoint before any call is issued; an unreachable replica fails
    /// here rather than on the first anchor. Production skips the fetch.
    pub async fn connect(config: LedgerConfig) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LedgerError::Client)?;

        let host = config.host.trim_end_matches('/').to_string();

        let root_key = match config.env {
            Environment::Production => None,
            Environment::Development => {
                let endpoint = format!("{host}/api/v1/status");
                let resp = client.get(&endpoint).send().await.map_err(|e| {
                    LedgerError::Connection {
                        endpoint: endpoint.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if !resp.status().is_success() {
                    return Err(LedgerError::Connection {
                        endpoint,
                        reason: format!("status endpoint returned {}", resp.status()),
                    });
                }
                let status: StatusReply =
                    resp.json().await.map_err(|e| LedgerError::Deserialization {
                        endpoint,
                        reason: e.to_string(),
                    })?;
                tracing::debug!("fetched replica root key for development ledger");
                Some(status.root_key)
            }
        };

        Ok(Self {
            client,
            host,
            canister_id: config.canister_id,
            root_key,
        })
    }

    /// Whether this client performed the dev root-key bootstrap.
    pub fn bootstrapped(&self) -> bool {
        self.root_key.is_some()
    }

    fn call_url(&self, method: &str) -> String {
        format!("{}/api/v1/canisters/{}/call/{method}", self.host, self.canister_id)
    }

    fn query_url(&self, method: &str) -> String {
        format!("{}/api/v1/canisters/{}/query/{method}", self.host, self.canister_id)
    }

    /// Persist an anchor record, returning the ledger-assigned record id.
    ///
    /// Not idempotent: two calls with identical arguments create two
    /// anchors, each with its own record id and ledger-assigned timestamp.
    /// Exactly-once semantics, if required, must be layered on top by the
    /// caller.
    pub async fn store_record(
        &self,
        patient_id: &str,
        content_address: &str,
        integrity_digest: &str,
        access_control: &AccessControlList,
    ) -> Result<StoreRecordReply, LedgerError> {
        let endpoint = self.call_url("storeRecord");
        let args = StoreRecordArgs {
            patient_id: patient_id.to_string(),
            content_address: content_address.to_string(),
            integrity_digest: integrity_digest.to_string(),
            access_control: access_control.entries().to_vec(),
        };

        let resp = self
            .client
            .post(&endpoint)
            .json(&args)
            .send()
            .await
            .map_err(|e| LedgerError::Connection {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Remote {
                endpoint,
                status,
                body,
            });
        }

        let reply: StoreRecordReply =
            resp.json().await.map_err(|e| LedgerError::Deserialization {
                endpoint,
                reason: e.to_string(),
            })?;
        tracing::debug!(
            patient_id,
            cid = content_address,
            record_id = reply.record_id,
            "anchor recorded in ledger"
        );
        Ok(reply)
    }

    /// Fetch all anchor records for a patient.
    ///
    /// Query-mode: side-effect-free and safe to retry. An empty result is
    /// returned by the ledger as an application fault with code
    /// `NO_RECORDS` and surfaces as [`LedgerError::NoRecords`].
    pub async fn get_records(&self, patient_id: &str) -> Result<Vec<LedgerRecord>, LedgerError> {
        let endpoint = self.query_url("getRecords");
        let args = GetRecordsArgs {
            patient_id: patient_id.to_string(),
        };

        let resp = self
            .client
            .post(&endpoint)
            .json(&args)
            .send()
            .await
            .map_err(|e| LedgerError::Connection {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();

            // The empty-result fault is distinguished by its machine code,
            // never by message text.
            if let Ok(fault) = serde_json::from_str::<FaultBody>(&body) {
                if fault.code == FAULT_NO_RECORDS {
                    return Err(LedgerError::NoRecords {
                        patient_id: patient_id.to_string(),
                    });
                }
            }
            return Err(LedgerError::Remote {
                endpoint,
                status,
                body,
            });
        }

        let reply: GetRecordsReply =
            resp.json().await.map_err(|e| LedgerError::Deserialization {
                endpoint,
                reason: e.to_string(),
            })?;
        Ok(reply.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        // Unknown values fall back to development so the bootstrap is
        // never skipped by a typo.
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }

    #[test]
    fn config_defaults() {
        let config = LedgerConfig::new("http://localhost:4943", "rrkah-fqaaa", Environment::Development);
        assert_eq!(config.timeout_secs, 30);
    }

    #[tokio::test]
    async fn connect_in_development_fails_fast_when_replica_down() {
        let config = LedgerConfig {
            host: "http://127.0.0.1:1".into(),
            canister_id: "rrkah-fqaaa".into(),
            env: Environment::Development,
            timeout_secs: 1,
        };
        let err = LedgerClient::connect(config).await.unwrap_err();
        assert!(matches!(err, LedgerError::Connection { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn connect_in_production_skips_bootstrap() {
        // Host is a closed port, yet connect succeeds: production never
        // fetches a replica-supplied key.
        let config = LedgerConfig {
            host: "http://127.0.0.1:1".into(),
            canister_id: "rrkah-fqaaa".into(),
            env: Environment::Production,
            timeout_secs: 1,
        };
        let client = LedgerClient::connect(config).await.unwrap();
        assert!(!client.bootstrapped());
    }

    #[tokio::test]
    async fn store_record_maps_transport_failure_to_connection() {
        let config = LedgerConfig {
            host: "http://127.0.0.1:1".into(),
            canister_id: "rrkah-fqaaa".into(),
            env: Environment::Production,
            timeout_secs: 1,
        };
        let client = LedgerClient::connect(config).await.unwrap();
        let acl = AccessControlList::normalize(None, "p1");
        let err = client
            .store_record("p1", "QmAbc", "digest", &acl)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Connection { .. }), "got {err:?}");
    }
}
