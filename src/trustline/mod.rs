//! Trustline workflow: reconciliation against two sources of truth, then
//! change-of-trust submission with result classification.

pub mod classify;
pub mod envelope;
pub mod service;
pub mod types;

pub use service::{CompletionHook, TrustlineService};
pub use types::{Asset, ReconcileOutcome, TrustRecord, TrustSource, WorkflowResult};
