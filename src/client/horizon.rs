//! HTTP client for the ledger gateway: account snapshots and transaction
//! submission.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::error::SextantError;
use crate::trustline::classify::classify_result_code;
use crate::trustline::types::Asset;

/// Account snapshot returned by the gateway. Fetched fresh per operation;
/// the sequence number is only valid at envelope-build time.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    /// Decimal string on the wire.
    pub sequence: String,
    #[serde(default)]
    pub subentry_count: u32,
    pub balances: Vec<BalanceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    pub balance: String,
    #[serde(default)]
    pub limit: Option<String>,
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
}

impl BalanceRecord {
    /// Exact, case-sensitive match on both code and issuer.
    pub fn matches(&self, asset: &Asset) -> bool {
        self.asset_code.as_deref() == Some(asset.code.as_str())
            && self.asset_issuer.as_deref() == Some(asset.issuer.as_str())
    }
}

impl AccountRecord {
    pub fn holds(&self, asset: &Asset) -> bool {
        self.balances.iter().any(|b| b.matches(asset))
    }

    /// Sequence number for the next transaction from this account.
    pub fn next_sequence(&self) -> Result<u64, SextantError> {
        self.sequence
            .parse::<u64>()
            .map(|s| s + 1)
            .map_err(|_| {
                SextantError::NetworkError(format!(
                    "Gateway returned malformed sequence: {}",
                    self.sequence
                ))
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub hash: String,
}

// Failure envelope returned by the gateway on a rejected submission.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    extras: Option<ErrorExtras>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtras {
    #[serde(default)]
    result_codes: Option<ResultCodes>,
}

#[derive(Debug, Deserialize)]
struct ResultCodes {
    #[serde(default)]
    transaction: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

/// Map a rejected submission onto the error taxonomy. The first operation
/// result code carries the classification; a body without structured codes
/// falls back to the transport status.
fn classify_submit_failure(status: StatusCode, body: &str) -> SextantError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(codes) = envelope.extras.and_then(|e| e.result_codes) {
            if let Some(op_code) = codes.operations.first() {
                return classify_result_code(op_code);
            }
            if let Some(tx_code) = codes.transaction {
                return SextantError::UnclassifiedLedgerError(tx_code);
            }
        }
    }
    SextantError::NetworkError(format!("Gateway returned {}", status))
}

/// Read and submit seam for the ledger gateway.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn load_account(&self, account_id: &str) -> Result<AccountRecord, SextantError>;
    async fn submit_transaction(&self, signed_envelope: &str)
        -> Result<SubmitResponse, SextantError>;
}

pub struct HorizonClient {
    base_url: String,
    client: Client,
}

impl HorizonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl LedgerGateway for HorizonClient {
    async fn load_account(&self, account_id: &str) -> Result<AccountRecord, SextantError> {
        let url = format!("{}/accounts/{}", self.base_url, account_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SextantError::NetworkError(format!("Gateway request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SextantError::AccountNotFound(account_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(SextantError::NetworkError(format!(
                "Gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<AccountRecord>()
            .await
            .map_err(|e| SextantError::NetworkError(format!("Failed to parse account: {}", e)))
    }

    async fn submit_transaction(
        &self,
        signed_envelope: &str,
    ) -> Result<SubmitResponse, SextantError> {
        let url = format!("{}/transactions", self.base_url);

        let response = self
            .client
            .post(&url)
            .form(&[("tx", signed_envelope)])
            .send()
            .await
            .map_err(|e| SextantError::NetworkError(format!("Gateway request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<SubmitResponse>()
                .await
                .map_err(|e| SextantError::NetworkError(format!("Failed to parse response: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_submit_failure(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_snapshot() {
        let json = r#"{
            "account_id": "GABCDEF",
            "sequence": "4113023891406848",
            "subentry_count": 2,
            "balances": [
                {"balance": "125.5000000", "limit": "10000.0000000",
                 "asset_type": "credit_alphanum4", "asset_code": "USDC", "asset_issuer": "GISSUER"},
                {"balance": "9999.0000000", "asset_type": "native"}
            ]
        }"#;
        let account: AccountRecord = serde_json::from_str(json).unwrap();
        assert_eq!(account.next_sequence().unwrap(), 4113023891406849);
        assert!(account.holds(&Asset::new("USDC", "GISSUER")));
        assert!(!account.holds(&Asset::new("USDC", "GOTHER")));
        assert!(!account.holds(&Asset::new("usdc", "GISSUER")));
    }

    #[test]
    fn test_native_balance_never_matches_an_asset() {
        let native = BalanceRecord {
            balance: "10.0".to_string(),
            limit: None,
            asset_type: "native".to_string(),
            asset_code: None,
            asset_issuer: None,
        };
        assert!(!native.matches(&Asset::new("USDC", "GISSUER")));
    }

    #[test]
    fn test_classify_submit_failure_uses_operation_code() {
        let body = r#"{"extras": {"result_codes": {"transaction": "tx_failed",
            "operations": ["op_line_full"]}}}"#;
        let err = classify_submit_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, SextantError::DuplicateTrustline));

        let body = r#"{"extras": {"result_codes": {"operations": ["op_low_reserve"]}}}"#;
        let err = classify_submit_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, SextantError::InsufficientReserve));
    }

    #[test]
    fn test_classify_submit_failure_falls_back() {
        let body = r#"{"extras": {"result_codes": {"transaction": "tx_bad_seq", "operations": []}}}"#;
        let err = classify_submit_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, SextantError::UnclassifiedLedgerError(code) if code == "tx_bad_seq"));

        let err = classify_submit_failure(StatusCode::INTERNAL_SERVER_ERROR, "not json");
        assert!(matches!(err, SextantError::NetworkError(_)));
    }

    #[test]
    fn test_malformed_sequence_is_an_error() {
        let account = AccountRecord {
            account_id: "GABCDEF".to_string(),
            sequence: "not a number".to_string(),
            subentry_count: 0,
            balances: vec![],
        };
        assert!(account.next_sequence().is_err());
    }
}
