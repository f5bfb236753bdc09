//! # medrec-ledger-stub — In-Memory Ledger Stub
//!
//! Implements the ledger canister wire API that `medrec-ledger` calls,
//! against an in-memory store. For development and integration testing
//! without a real replica.
//!
//! Storage is in-memory (DashMap) with no persistence — records are lost
//! on restart. Timestamps are stub-assigned nanoseconds since the Unix
//! epoch, mirroring the real ledger's append-time assignment.

mod routes;
mod store;

pub use routes::router;
pub use store::StubState;
