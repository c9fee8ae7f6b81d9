pub mod balance;
pub mod trustline;
pub mod wallet;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sextant")]
#[command(about = "Sextant trustline client CLI", long_about = None)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "sextant.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Local signing identity management
    Wallet {
        #[command(subcommand)]
        cmd: wallet::WalletCommands,
    },
    /// Trustline operations
    Trustline {
        #[command(subcommand)]
        cmd: trustline::TrustlineCommands,
    },
    /// Show an account's balances
    Balance {
        address: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        issuer: Option<String>,
    },
}
