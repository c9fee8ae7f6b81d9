use clap::Parser;

use sextant::cli::{self, Cli, Commands};
use sextant::config::SextantConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = SextantConfig::load_or_default(&cli.config);

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.client.log_level.clone())
            }),
        )
        .init();

    match cli.command {
        Some(Commands::Wallet { cmd }) => cli::wallet::handle_wallet_command(cmd, &config),
        Some(Commands::Trustline { cmd }) => {
            cli::trustline::handle_trustline_command(cmd, &config).await
        }
        Some(Commands::Balance {
            address,
            code,
            issuer,
        }) => cli::balance::handle_balance_command(address, code, issuer, &config).await,
        None => {
            println!("No command given. Try 'sextant --help'.");
        }
    }
}
