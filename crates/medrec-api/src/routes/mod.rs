//! Route modules.
//!
//! - `records` — the anchoring resource: multipart upload+anchor, query,
//!   and the ledger-half re-anchor endpoint.
//! - `health` — liveness and readiness probes (unauthenticated).

pub mod health;
pub mod records;
