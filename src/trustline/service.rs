//! The trustline workflow: reconcile existing trust against the ledger and
//! the mirror store, then build, sign and submit the change-of-trust
//! transaction.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::client::horizon::LedgerGateway;
use crate::client::mirror::MirrorStore;
use crate::config::NetworkConfig;
use crate::error::SextantError;
use crate::trustline::classify::classify_wallet_error;
use crate::trustline::envelope::{parse_limit, TransactionEnvelope};
use crate::trustline::types::{Asset, ReconcileOutcome, TrustRecord, TrustSource, WorkflowResult};
use crate::wallet::WalletAdapter;

/// Invoked exactly once, only when the network accepts a submission.
pub type CompletionHook = Box<dyn FnOnce() + Send>;

pub struct TrustlineService {
    gateway: Arc<dyn LedgerGateway>,
    mirror: Arc<dyn MirrorStore>,
    wallet: Arc<dyn WalletAdapter>,
    network_passphrase: String,
    base_fee: u64,
    tx_window_secs: u64,
    /// At-most-one outstanding submission per (account, code, issuer).
    /// Guards against double-creating a trustline from rapid repeated
    /// user actions.
    in_flight: Mutex<HashSet<(String, String, String)>>,
}

impl TrustlineService {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        mirror: Arc<dyn MirrorStore>,
        wallet: Arc<dyn WalletAdapter>,
        network: &NetworkConfig,
    ) -> Self {
        TrustlineService {
            gateway,
            mirror,
            wallet,
            network_passphrase: network.network_passphrase.clone(),
            base_fee: network.base_fee,
            tx_window_secs: network.tx_window_secs,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Determine whether the account already trusts the asset. Read-only.
    ///
    /// The ledger is authoritative: a matching balance entry answers the
    /// question and the mirror store is not consulted. On a ledger miss the
    /// mirror is checked; a mirror failure is logged and treated as "not
    /// found" so an unavailable secondary store never blocks the workflow.
    pub async fn reconcile(
        &self,
        account_id: &str,
        asset: &Asset,
    ) -> Result<ReconcileOutcome, SextantError> {
        let account = self.gateway.load_account(account_id).await?;

        if account.holds(asset) {
            return Ok(ReconcileOutcome {
                exists: true,
                source: TrustSource::Ledger,
            });
        }

        match self.mirror.find_trustline(account_id, asset).await {
            Ok(Some(_)) => Ok(ReconcileOutcome {
                exists: true,
                source: TrustSource::Mirror,
            }),
            Ok(None) => Ok(ReconcileOutcome {
                exists: false,
                source: TrustSource::None,
            }),
            Err(e) => {
                warn!("Mirror store lookup failed, treating as not found: {}", e);
                Ok(ReconcileOutcome {
                    exists: false,
                    source: TrustSource::None,
                })
            }
        }
    }

    /// Build, sign and submit a change-trust transaction.
    ///
    /// The caller is expected to have reconciled first. A second call for
    /// the same (account, asset) while one is outstanding is rejected
    /// before it reaches the signing agent or the gateway.
    pub async fn submit(
        &self,
        account_id: &str,
        asset: &Asset,
        limit: &str,
        on_success: Option<CompletionHook>,
    ) -> WorkflowResult {
        let key = (
            account_id.to_string(),
            asset.code.clone(),
            asset.issuer.clone(),
        );
        {
            let mut in_flight = self.in_flight.lock().expect("in-flight set poisoned");
            if !in_flight.insert(key.clone()) {
                return WorkflowResult::Failed {
                    error: SextantError::SubmissionInFlight,
                };
            }
        }

        let result = self.submit_inner(account_id, asset, limit, on_success).await;

        self.in_flight
            .lock()
            .expect("in-flight set poisoned")
            .remove(&key);
        result
    }

    async fn submit_inner(
        &self,
        account_id: &str,
        asset: &Asset,
        limit: &str,
        on_success: Option<CompletionHook>,
    ) -> WorkflowResult {
        // The agent's connection state is not ours and may have changed
        // since reconciliation. Re-check before touching the network.
        if !self.wallet.is_connected().await {
            return WorkflowResult::Failed {
                error: SextantError::WalletNotConnected,
            };
        }

        let address = match self.wallet.get_address().await {
            Ok(a) => a,
            Err(e) => {
                return WorkflowResult::Failed {
                    error: classify_wallet_error(e),
                }
            }
        };
        if address.is_empty() {
            return WorkflowResult::Failed {
                error: SextantError::IdentityUnavailable,
            };
        }
        if address != account_id {
            return WorkflowResult::Failed {
                error: SextantError::Unclassified(format!(
                    "Signing agent resolved {} but the submission targets {}",
                    address, account_id
                )),
            };
        }

        let trust_limit = match parse_limit(limit) {
            Ok(d) => d,
            Err(e) => return WorkflowResult::Failed { error: e },
        };

        // Fresh snapshot: the sequence number must be current at
        // envelope-build time or the ledger rejects the submission.
        let account = match self.gateway.load_account(account_id).await {
            Ok(a) => a,
            Err(e) => return WorkflowResult::Failed { error: e },
        };
        let sequence = match account.next_sequence() {
            Ok(s) => s,
            Err(e) => return WorkflowResult::Failed { error: e },
        };

        let now = Utc::now().timestamp() as u64;
        let envelope = match TransactionEnvelope::change_trust(
            account_id,
            sequence,
            asset.clone(),
            limit,
            self.base_fee,
            self.tx_window_secs,
            now,
        ) {
            Ok(e) => e,
            Err(e) => return WorkflowResult::Failed { error: e },
        };

        let encoded = match envelope.encode() {
            Ok(e) => e,
            Err(e) => return WorkflowResult::Failed { error: e },
        };
        let signed = match self
            .wallet
            .sign_transaction(&encoded, &self.network_passphrase)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                return WorkflowResult::Failed {
                    error: classify_wallet_error(e),
                }
            }
        };

        // One shot: a rejected submission is surfaced, never retried.
        let response = match self.gateway.submit_transaction(&signed).await {
            Ok(r) => r,
            Err(e) => return WorkflowResult::Failed { error: e },
        };
        info!(
            "Change-trust accepted for {}:{} tx {}",
            asset.code, asset.issuer, response.hash
        );

        // Fire-and-forget: the on-chain change already happened, so a
        // failed mirror write must not turn success into failure.
        let record = TrustRecord {
            user_id: account_id.to_string(),
            asset_code: asset.code.clone(),
            asset_issuer: asset.issuer.clone(),
            trust_limit,
            tx_hash: response.hash.clone(),
        };
        if let Err(e) = self.mirror.insert_trustline(&record).await {
            warn!("Mirror store write failed after on-chain success: {}", e);
        }

        if let Some(hook) = on_success {
            hook();
        }
        WorkflowResult::Submitted {
            tx_hash: response.hash,
        }
    }

    /// The full user action: resolve the signing identity, reconcile, and
    /// submit only on a negative reconciliation.
    pub async fn create_trustline(
        &self,
        asset: &Asset,
        limit: &str,
        on_success: Option<CompletionHook>,
    ) -> WorkflowResult {
        if !self.wallet.is_connected().await {
            return WorkflowResult::Failed {
                error: SextantError::WalletNotConnected,
            };
        }
        let account_id = match self.wallet.get_address().await {
            Ok(a) => a,
            Err(e) => {
                return WorkflowResult::Failed {
                    error: classify_wallet_error(e),
                }
            }
        };
        if account_id.is_empty() {
            return WorkflowResult::Failed {
                error: SextantError::IdentityUnavailable,
            };
        }

        match self.reconcile(&account_id, asset).await {
            Ok(outcome) if outcome.exists => WorkflowResult::AlreadyExists {
                source: outcome.source,
            },
            Ok(_) => self.submit(&account_id, asset, limit, on_success).await,
            Err(e) => WorkflowResult::Failed { error: e },
        }
    }
}
