//! # medrec-anchor — Anchoring and Query Orchestration
//!
//! The core protocol of the stack: upload a payload to content-addressed
//! storage, compute an independent integrity digest, anchor the pair plus
//! an access-control list into the external ledger, and read anchors back
//! with gateway enrichment.
//!
//! ## Failure Design
//!
//! The two external systems fail independently and asymmetrically:
//!
//! - Storage upload failure is **fatal** — nothing has been persisted
//!   anywhere, the whole operation can simply be retried.
//! - Ledger anchoring failure after a successful upload **downgrades** the
//!   result instead of failing it: the object is already retrievable by
//!   content address, which is independently useful, and the caller can
//!   re-drive just the ledger half via
//!   [`RecordAnchorService::anchor_existing`] without re-uploading.
//!
//! An operation aborted between the two stages leaves a pinned object with
//! no anchor. This orphan state is accepted and documented; reclaiming
//! unanchored objects is left to the storage network's retention rules.

mod query;
mod service;

pub use query::{EnrichedAnchorRecord, RecordQueryService, RetrievalError};
pub use service::{AnchorError, AnchorOutcome, AnchorPolicy, AnchorStatus, RecordAnchorService};
