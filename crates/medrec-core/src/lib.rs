//! # medrec-core — Foundational Types for the Medrec Stack
//!
//! Domain types shared by every other crate in the workspace:
//!
//! - [`ContentDigest`] and [`sha256_digest()`] — the integrity digest
//!   computed over the exact bytes that were uploaded, independent of the
//!   storage network's own content addressing.
//! - [`AnchorRecord`] — the immutable tuple persisted in the external
//!   ledger: `{patient_id, content_address, integrity_digest,
//!   access_control, timestamp}`.
//! - [`AccessControlList`] — normalization of caller-supplied access
//!   control input into the list the ledger stores.
//!
//! ## Crate Policy
//!
//! - No I/O. Everything here is pure and deterministic.
//! - Sits at the bottom of the dependency DAG — depends on no other
//!   workspace crate.

pub mod access;
pub mod digest;
pub mod error;
pub mod record;

pub use access::AccessControlList;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::ValidationError;
pub use record::AnchorRecord;
