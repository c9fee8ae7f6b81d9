use clap::Subcommand;

use crate::config::SextantConfig;
use crate::wallet::Keystore;

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new signing identity
    Create,
    /// Import an identity from mnemonic
    Import {
        #[arg(long)]
        mnemonic: String,
    },
    /// Show the identity's address
    Show,
    /// Encrypt the keystore with a password
    Encrypt {
        #[arg(long)]
        password: String,
    },
    /// Decrypt the keystore
    Decrypt {
        #[arg(long)]
        password: String,
    },
}

pub fn handle_wallet_command(cmd: WalletCommands, config: &SextantConfig) {
    let path = &config.client.keystore_file;

    match cmd {
        WalletCommands::Create => {
            if std::path::Path::new(path).exists() {
                println!("Keystore already exists at {}. Remove it first to create a new identity.", path);
                return;
            }
            match Keystore::generate() {
                Ok(keystore) => {
                    if let Err(e) = keystore.save(path) {
                        println!("Error saving keystore: {}", e);
                        return;
                    }
                    println!("Identity created at {}", path);
                    println!("Address: {}", keystore.address);
                    if let Some(mnemonic) = &keystore.mnemonic {
                        println!("Mnemonic: {}", mnemonic);
                        println!("KEEP THIS SAFE!");
                    }
                }
                Err(e) => println!("Error creating identity: {}", e),
            }
        }
        WalletCommands::Import { mnemonic } => match Keystore::from_mnemonic(&mnemonic) {
            Ok(keystore) => {
                if let Err(e) = keystore.save(path) {
                    println!("Error saving keystore: {}", e);
                    return;
                }
                println!("Identity imported. Address: {}", keystore.address);
            }
            Err(e) => println!("Failed to import: {}", e),
        },
        WalletCommands::Show => match Keystore::load(path) {
            Ok(keystore) => {
                println!("Address: {}", keystore.address);
                if keystore.is_encrypted {
                    println!("Keystore is encrypted.");
                }
            }
            Err(e) => println!("Error: {}", e),
        },
        WalletCommands::Encrypt { password } => match Keystore::load(path) {
            Ok(mut keystore) => {
                if keystore.is_encrypted {
                    println!("Keystore is already encrypted.");
                    return;
                }
                if let Err(e) = keystore.encrypt(&password).and_then(|_| keystore.save(path)) {
                    println!("Error encrypting keystore: {}", e);
                    return;
                }
                println!("Keystore encrypted.");
            }
            Err(e) => println!("Error: {}", e),
        },
        WalletCommands::Decrypt { password } => match Keystore::load(path) {
            Ok(mut keystore) => {
                if let Err(e) = keystore.decrypt(&password).and_then(|_| keystore.save(path)) {
                    println!("Error decrypting keystore: {}", e);
                    return;
                }
                println!("Keystore decrypted.");
            }
            Err(e) => println!("Error: {}", e),
        },
    }
}
