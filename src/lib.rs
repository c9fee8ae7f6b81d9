pub mod cli;
pub mod client; // ledger gateway + mirror store
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod trustline; // reconcile + submit workflow
pub mod wallet;
