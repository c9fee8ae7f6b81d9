//! Core types for the trustline workflow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SextantError;

/// A non-native asset, identified by its short code and issuing account.
/// Identity is the exact (code, issuer) pair; comparisons are case-sensitive.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Asset {
    pub code: String,
    pub issuer: String,
}

impl Asset {
    pub fn new(code: &str, issuer: &str) -> Self {
        Asset {
            code: code.to_string(),
            issuer: issuer.to_string(),
        }
    }
}

/// Where evidence of an existing trustline came from.
///
/// The ledger and the mirror store can disagree; the ledger is authoritative.
/// Keeping the provenance explicit instead of collapsing to a bool makes the
/// disagreement visible to callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustSource {
    Ledger,
    Mirror,
    None,
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub exists: bool,
    pub source: TrustSource,
}

/// Row shape of the mirror store's `trustlines` table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrustRecord {
    pub user_id: String,
    pub asset_code: String,
    pub asset_issuer: String,
    /// Numeric column on the mirror side.
    #[serde(with = "rust_decimal::serde::float")]
    pub trust_limit: Decimal,
    pub tx_hash: String,
}

/// Terminal outcome of a trustline creation attempt.
#[derive(Debug)]
pub enum WorkflowResult {
    /// The trust relationship already exists; nothing was submitted.
    AlreadyExists { source: TrustSource },
    /// The change-trust transaction was accepted by the network.
    Submitted { tx_hash: String },
    /// The workflow terminated before the network accepted anything.
    Failed { error: SextantError },
}

impl WorkflowResult {
    pub fn is_submitted(&self) -> bool {
        matches!(self, WorkflowResult::Submitted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_identity_is_case_sensitive() {
        let a = Asset::new("USDC", "GBBD");
        let b = Asset::new("usdc", "GBBD");
        assert_ne!(a, b);
        assert_eq!(a, Asset::new("USDC", "GBBD"));
    }
}
