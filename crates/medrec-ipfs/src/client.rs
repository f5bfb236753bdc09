//! Storage network HTTP client: pinned add, gateway reads, liveness probe.

use std::time::Duration;

use serde::Deserialize;

use crate::error::IpfsError;
use crate::retry::RetryPolicy;

/// Configuration for the storage network client.
#[derive(Debug, Clone)]
pub struct IpfsConfig {
    /// Base URL of the node HTTP API (e.g., `http://localhost:5001/api/v0`).
    pub api_url: String,
    /// Base URL of the read gateway (e.g., `http://localhost:8080/ipfs`).
    pub gateway_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Backoff schedule for transport failures on `add`.
    pub retry: RetryPolicy,
}

impl IpfsConfig {
    /// Create a new configuration with the default timeout and retry
    /// schedule.
    pub fn new(api_url: impl Into<String>, gateway_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            gateway_url: gateway_url.into(),
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for IpfsConfig {
    /// Defaults matching a local node with standard ports.
    fn default() -> Self {
        Self::new("http://localhost:5001/api/v0", "http://localhost:8080/ipfs")
    }
}

/// Result of a pinned upload: the content address the network assigned and
/// the object's size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedObject {
    /// Content-derived identifier (CID). Opaque to this stack.
    pub hash: String,
    /// Size in bytes as declared by the network, falling back to the
    /// input length when the response omits it.
    pub size: u64,
}

/// One line of the node's newline-delimited add response.
///
/// For large files the node emits one line per internal DAG node; the last
/// line describes the file as a whole. `Size` is a decimal string in the
/// node API and may be absent.
#[derive(Debug, Deserialize)]
struct AddLine {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size")]
    size: Option<String>,
}

/// HTTP client for the content-addressed storage network.
#[derive(Debug, Clone)]
pub struct IpfsClient {
    client: reqwest::Client,
    api_url: String,
    gateway_url: String,
    retry: RetryPolicy,
}

impl IpfsClient {
    /// Create a client from configuration.
    pub fn new(config: IpfsConfig) -> Result<Self, IpfsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(IpfsError::Client)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    /// Upload a payload with pinning and return its content address.
    ///
    /// Safe to retry: the store is content-addressed, so re-adding the same
    /// bytes yields the same address.
    pub async fn add(&self, bytes: Vec<u8>, filename: &str) -> Result<AddedObject, IpfsError> {
        let endpoint = format!("{}/add?pin=true", self.api_url);
        let input_len = bytes.len() as u64;

        let resp = self
            .retry
            .run("add", || {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.to_string());
                let form = reqwest::multipart::Form::new().part("file", part);
                self.client.post(&endpoint).multipart(form).send()
            })
            .await
        .map_err(|source| IpfsError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(IpfsError::Api {
                endpoint,
                status,
                body,
            });
        }

        let body = resp.text().await.map_err(|source| IpfsError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        let added = parse_add_response(&body, input_len)
            .map_err(|reason| IpfsError::Response { endpoint, reason })?;
        tracing::debug!(cid = %added.hash, size = added.size, "object pinned");
        Ok(added)
    }

    /// Build the resolvable gateway URL for a content address. Pure.
    pub fn gateway_url(&self, hash: &str) -> String {
        format!("{}/{hash}", self.gateway_url)
    }

    /// Read an object's bytes back through the gateway.
    ///
    /// Used by digest verification: the returned bytes must hash back to
    /// the record's integrity digest.
    pub async fn fetch(&self, hash: &str) -> Result<Vec<u8>, IpfsError> {
        let endpoint = self.gateway_url(hash);
        let resp = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|source| IpfsError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(IpfsError::Api {
                endpoint,
                status,
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|source| IpfsError::Http {
            endpoint,
            source,
        })?;
        Ok(bytes.to_vec())
    }

    /// Lightweight liveness probe against the node's version endpoint.
    ///
    /// Single-shot: a down node answers `false` after one attempt, without
    /// the backoff schedule used for uploads. All failures are swallowed
    /// into `false` — callers use this for readiness reporting, not error
    /// handling.
    pub async fn check_connection(&self) -> bool {
        let endpoint = format!("{}/version", self.api_url);
        match self.client.post(&endpoint).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!("storage node liveness probe failed: {e}");
                false
            }
        }
    }
}

/// Parse the newline-delimited add response, taking the last line as the
/// canonical result for the whole file.
fn parse_add_response(body: &str, input_len: u64) -> Result<AddedObject, String> {
    let last_line = body
        .trim()
        .lines()
        .last()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| "empty add response body".to_string())?;

    let line: AddLine =
        serde_json::from_str(last_line).map_err(|e| format!("malformed JSON line: {e}"))?;

    if line.hash.is_empty() {
        return Err("add response carried an empty Hash".to_string());
    }

    let size = line
        .size
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(input_len);

    Ok(AddedObject {
        hash: line.hash,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = IpfsConfig::default();
        assert_eq!(config.api_url, "http://localhost:5001/api/v0");
        assert_eq!(config.gateway_url, "http://localhost:8080/ipfs");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = IpfsClient::new(IpfsConfig::new(
            "http://localhost:5001/api/v0/",
            "http://localhost:8080/ipfs/",
        ))
        .expect("client should build");
        assert_eq!(client.gateway_url("Qm123"), "http://localhost:8080/ipfs/Qm123");
    }

    #[test]
    fn parse_single_line_response() {
        let body = r#"{"Name":"scan.pdf","Hash":"QmAbc","Size":"1234"}"#;
        let added = parse_add_response(body, 999).unwrap();
        assert_eq!(added.hash, "QmAbc");
        assert_eq!(added.size, 1234);
    }

    #[test]
    fn parse_takes_last_line_of_chunked_response() {
        // Large files produce one line per DAG node; the last line is the
        // whole-file result.
        let body = concat!(
            "{\"Name\":\"chunk-0\",\"Hash\":\"QmChunk0\",\"Size\":\"262158\"}\n",
            "{\"Name\":\"chunk-1\",\"Hash\":\"QmChunk1\",\"Size\":\"262158\"}\n",
            "{\"Name\":\"big.bin\",\"Hash\":\"QmWhole\",\"Size\":\"524316\"}\n",
        );
        let added = parse_add_response(body, 0).unwrap();
        assert_eq!(added.hash, "QmWhole");
        assert_eq!(added.size, 524316);
    }

    #[test]
    fn parse_missing_size_falls_back_to_input_length() {
        let body = r#"{"Name":"x","Hash":"QmNoSize"}"#;
        let added = parse_add_response(body, 10).unwrap();
        assert_eq!(added.size, 10);
    }

    #[test]
    fn parse_unparseable_size_falls_back_to_input_length() {
        let body = r#"{"Name":"x","Hash":"QmBadSize","Size":"not-a-number"}"#;
        let added = parse_add_response(body, 7).unwrap();
        assert_eq!(added.size, 7);
    }

    #[test]
    fn parse_empty_body_is_an_error() {
        assert!(parse_add_response("", 0).is_err());
        assert!(parse_add_response("\n\n", 0).is_err());
    }

    #[test]
    fn parse_malformed_json_is_an_error() {
        assert!(parse_add_response("not json", 0).is_err());
    }

    #[tokio::test]
    async fn check_connection_swallows_transport_errors() {
        let client = IpfsClient::new(IpfsConfig {
            api_url: "http://127.0.0.1:1/api/v0".into(),
            gateway_url: "http://127.0.0.1:1/ipfs".into(),
            timeout_secs: 1,
            retry: RetryPolicy::default(),
        })
        .unwrap();
        assert!(!client.check_connection().await);
    }

    #[tokio::test]
    async fn liveness_probe_is_single_shot() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tokio::io::AsyncReadExt;

        // A listener that accepts, reads the request, and hangs up without
        // replying, counting every connection it sees.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counted = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut sock, _) = listener.accept().await.unwrap();
                counted.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = sock.read(&mut buf).await;
            }
        });

        // Even with a retrying schedule configured, the probe makes one
        // attempt and reports down.
        let client = IpfsClient::new(IpfsConfig {
            api_url: format!("http://{addr}/api/v0"),
            gateway_url: format!("http://{addr}/ipfs"),
            timeout_secs: 1,
            retry: RetryPolicy::default(),
        })
        .unwrap();
        assert!(!client.check_connection().await);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
