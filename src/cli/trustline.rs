use async_trait::async_trait;
use clap::Subcommand;
use std::sync::Arc;

use crate::client::{HorizonClient, HttpMirrorStore};
use crate::config::SextantConfig;
use crate::trustline::{Asset, CompletionHook, TrustSource, TrustlineService, WorkflowResult};
use crate::wallet::{Keystore, LocalWallet, WalletAdapter, WalletError};

#[derive(Subcommand)]
pub enum TrustlineCommands {
    /// Create a trustline for an asset
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        issuer: String,
        /// Trust limit; defaults to the configured default
        #[arg(long)]
        limit: Option<String>,
        /// Password for an encrypted keystore
        #[arg(long)]
        password: Option<String>,
    },
    /// Check whether a trustline exists, and where the evidence lives
    Check {
        #[arg(long)]
        account: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        issuer: String,
    },
}

fn build_service(config: &SextantConfig, wallet: Arc<dyn WalletAdapter>) -> TrustlineService {
    let gateway = Arc::new(HorizonClient::new(&config.network.horizon_url));
    let mirror = Arc::new(HttpMirrorStore::new(
        &config.mirror.url,
        config.mirror.api_key.clone(),
    ));
    TrustlineService::new(gateway, mirror, wallet, &config.network)
}

/// Placeholder agent for read-only commands; reports disconnected.
struct Detached;

#[async_trait]
impl WalletAdapter for Detached {
    async fn is_connected(&self) -> bool {
        false
    }

    async fn get_address(&self) -> Result<String, WalletError> {
        Err(WalletError::NotConnected)
    }

    async fn sign_transaction(
        &self,
        _envelope: &str,
        _network_passphrase: &str,
    ) -> Result<String, WalletError> {
        Err(WalletError::NotConnected)
    }
}

pub async fn handle_trustline_command(cmd: TrustlineCommands, config: &SextantConfig) {
    match cmd {
        TrustlineCommands::Create {
            code,
            issuer,
            limit,
            password,
        } => {
            let mut keystore = match Keystore::load(&config.client.keystore_file) {
                Ok(k) => k,
                Err(e) => {
                    println!("Error: {}. Run 'sextant wallet create' first.", e);
                    return;
                }
            };
            if keystore.is_encrypted {
                let Some(pw) = password else {
                    println!("Keystore is encrypted; pass --password.");
                    return;
                };
                if let Err(e) = keystore.decrypt(&pw) {
                    println!("Error: {}", e);
                    return;
                }
            }
            let wallet =
                match LocalWallet::from_keystore(&keystore, &config.network.network_passphrase) {
                    Ok(w) => w,
                    Err(e) => {
                        println!("Error: {}", e);
                        return;
                    }
                };

            let service = build_service(config, Arc::new(wallet));
            let limit = limit.unwrap_or_else(|| config.client.default_trust_limit.clone());
            let asset = Asset::new(&code, &issuer);

            let hook: CompletionHook = Box::new({
                let code = code.clone();
                move || println!("✓ Trustline created. You can now receive {}.", code)
            });

            println!("Creating trustline for {} (limit {})...", code, limit);
            match service.create_trustline(&asset, &limit, Some(hook)).await {
                WorkflowResult::AlreadyExists { source } => {
                    let where_ = match source {
                        TrustSource::Ledger => "on the ledger",
                        TrustSource::Mirror => "in the mirror store",
                        TrustSource::None => "nowhere",
                    };
                    println!(
                        "A trustline for {} already exists ({}). Nothing to do.",
                        code, where_
                    );
                }
                WorkflowResult::Submitted { tx_hash } => {
                    println!("Transaction hash: {}", tx_hash);
                }
                WorkflowResult::Failed { error } => {
                    println!("Error creating trustline: {}", error);
                }
            }
        }
        TrustlineCommands::Check {
            account,
            code,
            issuer,
        } => {
            let service = build_service(config, Arc::new(Detached));
            match service.reconcile(&account, &Asset::new(&code, &issuer)).await {
                Ok(outcome) if outcome.exists => match outcome.source {
                    TrustSource::Ledger => println!("Trustline for {} exists on the ledger.", code),
                    TrustSource::Mirror => println!(
                        "Trustline for {} is recorded in the mirror store but not visible on the ledger.",
                        code
                    ),
                    TrustSource::None => {}
                },
                Ok(_) => println!("No trustline for {} on {}.", code, account),
                Err(e) => println!("Error: {}", e),
            }
        }
    }
}
