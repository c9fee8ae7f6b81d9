use serde::{Deserialize, Serialize};
use std::fs;
use aes_gcm::{
    aead::{Aead, KeyInit}, // Aes256Gcm trait imports
    Aes256Gcm, Nonce,
};
use async_trait::async_trait;
use pbkdf2::pbkdf2;
use hmac::Hmac;
use sha2::Sha256;
use rand::{Rng, thread_rng};
use thiserror::Error;

use crate::crypto::KeyPair;
use crate::error::SextantError;
use crate::trustline::envelope::TransactionEnvelope;

/// Structured failure kinds reported by a signing agent. The workflow
/// classifies on these kinds, never on message substrings.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Wallet has no usable account identifier")]
    NoAddress,
    #[error("User declined the signing request")]
    Rejected,
    #[error("Refusing to sign for network: {0}")]
    WrongNetwork(String),
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),
}

/// Contract of a signing agent. The agent owns its connection state and its
/// keys; the workflow only observes them.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    async fn is_connected(&self) -> bool;

    /// The account identifier the agent signs for.
    async fn get_address(&self) -> Result<String, WalletError>;

    /// Sign an encoded envelope against the given network. The agent must
    /// reject a passphrase for a network it is not configured for.
    async fn sign_transaction(
        &self,
        envelope: &str,
        network_passphrase: &str,
    ) -> Result<String, WalletError>;
}

/// On-disk signing identity: a mnemonic-backed keypair, optionally encrypted
/// at rest with a password.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Keystore {
    pub address: String,
    #[serde(default)]
    pub mnemonic: Option<String>,
    #[serde(default)]
    pub encrypted_mnemonic: Option<Vec<u8>>,
    #[serde(default)]
    pub encryption_salt: Option<Vec<u8>>,
    #[serde(default)]
    pub is_encrypted: bool,
}

impl Keystore {
    /// Generate a fresh identity with a new 12-word mnemonic.
    pub fn generate() -> Result<Self, SextantError> {
        let mnemonic = KeyPair::generate_mnemonic();
        Self::from_mnemonic(&mnemonic)
    }

    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, SextantError> {
        let kp = KeyPair::from_mnemonic(mnemonic)?;
        Ok(Keystore {
            address: kp.public_key_hex(),
            mnemonic: Some(mnemonic.to_string()),
            encrypted_mnemonic: None,
            encryption_salt: None,
            is_encrypted: false,
        })
    }

    pub fn save(&self, path: &str) -> Result<(), SextantError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SextantError::SerializationError(e.to_string()))?;
        fs::write(path, json).map_err(|e| SextantError::InvalidState(e.to_string()))
    }

    pub fn load(path: &str) -> Result<Self, SextantError> {
        let data = fs::read_to_string(path).map_err(|e| {
            SextantError::InvalidState(format!("Cannot read keystore {}: {}", path, e))
        })?;
        serde_json::from_str(&data).map_err(|e| SextantError::SerializationError(e.to_string()))
    }

    /// Restore the signing keypair. Fails while the keystore is encrypted.
    pub fn keypair(&self) -> Result<KeyPair, SextantError> {
        match &self.mnemonic {
            Some(m) => KeyPair::from_mnemonic(m),
            None => Err(SextantError::InvalidState(
                "Keystore is locked; decrypt it first".to_string(),
            )),
        }
    }

    pub fn encrypt(&mut self, password: &str) -> Result<(), SextantError> {
        let mnemonic_str = match &self.mnemonic {
            Some(m) => m.clone(),
            None => {
                return Err(SextantError::InvalidState(
                    "No mnemonic to encrypt".to_string(),
                ))
            }
        };

        // Generate Salt
        let mut salt = [0u8; 16];
        thread_rng().fill(&mut salt);

        // Derive Key PBKDF2
        let mut key = [0u8; 32]; // AES-256
        pbkdf2::<Hmac<Sha256>>(password.as_bytes(), &salt, 100_000, &mut key);

        // Encrypt
        let cipher = Aes256Gcm::new(&key.into());
        let mut nonce_bytes = [0u8; 12];
        thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, mnemonic_str.as_bytes())
            .map_err(|e| SextantError::InvalidState(format!("Encryption failure: {:?}", e)))?;

        // Store Nonce + Ciphertext in one blob
        let mut final_blob = Vec::new();
        final_blob.extend_from_slice(&nonce_bytes);
        final_blob.extend_from_slice(&ciphertext);

        self.encrypted_mnemonic = Some(final_blob);
        self.encryption_salt = Some(salt.to_vec());
        self.is_encrypted = true;
        self.mnemonic = None; // Clear plaintext

        Ok(())
    }

    pub fn decrypt(&mut self, password: &str) -> Result<(), SextantError> {
        if !self.is_encrypted {
            return Ok(()); // Already decrypted
        }
        let blob = self
            .encrypted_mnemonic
            .as_ref()
            .ok_or(SextantError::InvalidState("No encrypted data".to_string()))?;
        let salt = self
            .encryption_salt
            .as_ref()
            .ok_or(SextantError::InvalidState("No salt".to_string()))?;

        if blob.len() < 12 {
            return Err(SextantError::InvalidState("Invalid blob size".to_string()));
        }

        let nonce_bytes = &blob[0..12];
        let ciphertext = &blob[12..];

        // Derive Key
        let mut key = [0u8; 32];
        pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, 100_000, &mut key);

        let cipher = Aes256Gcm::new(&key.into());
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|_| {
            SextantError::InvalidState("Decryption failed (Wrong password?)".to_string())
        })?;

        let mnemonic_str = String::from_utf8(plaintext)
            .map_err(|_| SextantError::InvalidState("Invalid UTF8".to_string()))?;

        self.mnemonic = Some(mnemonic_str);
        self.is_encrypted = false;
        self.encrypted_mnemonic = None;
        self.encryption_salt = None;

        Ok(())
    }
}

/// A signing agent backed by a local keypair. Stands in for the browser
/// extension when the workflow runs from the CLI or from tests.
pub struct LocalWallet {
    keypair: KeyPair,
    network_passphrase: String,
}

impl LocalWallet {
    pub fn new(keypair: KeyPair, network_passphrase: &str) -> Self {
        LocalWallet {
            keypair,
            network_passphrase: network_passphrase.to_string(),
        }
    }

    pub fn from_keystore(keystore: &Keystore, network_passphrase: &str) -> Result<Self, SextantError> {
        Ok(Self::new(keystore.keypair()?, network_passphrase))
    }
}

#[async_trait]
impl WalletAdapter for LocalWallet {
    async fn is_connected(&self) -> bool {
        true
    }

    async fn get_address(&self) -> Result<String, WalletError> {
        Ok(self.keypair.public_key_hex())
    }

    async fn sign_transaction(
        &self,
        envelope: &str,
        network_passphrase: &str,
    ) -> Result<String, WalletError> {
        if network_passphrase != self.network_passphrase {
            return Err(WalletError::WrongNetwork(network_passphrase.to_string()));
        }
        let envelope = TransactionEnvelope::decode(envelope)
            .map_err(|e| WalletError::Unavailable(format!("Malformed envelope: {}", e)))?;
        let signed = envelope.sign(&self.keypair, network_passphrase);
        signed
            .encode()
            .map_err(|e| WalletError::Unavailable(e.to_string()))
    }
}
