//! Fabric zoning apply
//!
//! Object resolution, the fabric service client and the orchestration of
//! delete, purge and restore runs with a fresh-checksum commit.

pub mod confirm;
pub mod fabric;
pub mod http;
pub mod outcome;
pub mod plan;
pub mod transaction;


pub use confirm::{accepts, Confirm, StdinConfirm};
pub use fabric::{Credentials, DeleteOutcome, FabricZoningService, SessionToken};
pub use http::HttpFabricClient;
pub use outcome::{
    BatchOutcome, CommitDecision, PurgeOutcome, RestoreOutcome, TargetResult, TargetStatus,
};
pub use plan::{ChangePlan, ObjectResolver};
pub use transaction::{FetchedDocuments, ZoningOrchestrator, DEFAULT_PACING};
