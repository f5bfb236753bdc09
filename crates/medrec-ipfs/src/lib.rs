//! # medrec-ipfs — Content-Addressed Storage Client
//!
//! HTTP client for the storage network's add/pin API and gateway read API.
//! Turns a binary payload into a content address and byte size, builds
//! resolvable gateway URLs, and probes node liveness.
//!
//! ## Architecture
//!
//! [`IpfsClient`] wraps a `reqwest::Client` with the node's API base URL
//! and the gateway base URL. It is `Send + Sync` and designed to be shared
//! via `Arc` across async tasks.
//!
//! ## Error Handling
//!
//! HTTP errors map to [`IpfsError`] with diagnostic context: the endpoint,
//! the HTTP status, and a response body excerpt.
//!
//! ## Retry
//!
//! `add` is safe to retry — the store is content-addressed, so a duplicate
//! add of the same bytes yields the same address. Transport failures on
//! `add` are retried per the configured [`RetryPolicy`]; non-2xx responses
//! are not, and the liveness probe is always single-shot.

mod client;
mod error;
mod retry;

pub use client::{AddedObject, IpfsClient, IpfsConfig};
pub use error::IpfsError;
pub use retry::RetryPolicy;
