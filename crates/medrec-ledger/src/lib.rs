//! # medrec-ledger — Ledger Canister Client
//!
//! Typed HTTP binding to the external append-only ledger that records
//! per-patient anchor metadata. The record shape is declared exactly once
//! ([`wire::LedgerRecord`]) and both the read and write paths — and the
//! development stub — conform to it, so the shapes cannot drift.
//!
//! ## Interface
//!
//! - `storeRecord(patientId, contentAddress, integrityDigest, accessControl)`
//!   — update call, **not idempotent**: invoking it twice creates two
//!   anchors. Callers needing exactly-once must layer a dedup key on top.
//! - `getRecords(patientId)` — query call, side-effect-free and safe to
//!   retry. An empty result is signaled by the ledger as an application
//!   fault and surfaces here as the dedicated [`LedgerError::NoRecords`]
//!   variant, recognized by its semantic code and never by message text.
//!
//! ## Trust Bootstrap
//!
//! Non-production replicas sign with a key that is not baked into clients;
//! [`LedgerClient::connect`] fetches the replica root key from the status
//! endpoint before issuing any call. Production environments skip the
//! fetch — a production client must never trust a replica-supplied key.

mod client;
mod error;
pub mod wire;

pub use client::{Environment, LedgerClient, LedgerConfig};
pub use error::LedgerError;
