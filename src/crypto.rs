use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore; // Imported for fill_bytes
use hex;
use bip39::{Language, Mnemonic};

use crate::error::SextantError;

pub struct KeyPair {
    pub signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new Ed25519 keypair
    pub fn new() -> Self {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        KeyPair { signing_key }
    }

    /// Generate a new 12-word mnemonic
    pub fn generate_mnemonic() -> String {
        let mut entropy = [0u8; 16]; // 128 bits = 12 words
        let mut csprng = OsRng;
        csprng.fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy(&entropy).expect("Failed to create mnemonic");
        mnemonic.to_string()
    }

    /// Restore keypair from mnemonic
    pub fn from_mnemonic(phrase: &str) -> Result<Self, SextantError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
            .map_err(|e| SextantError::KeyError(format!("Invalid mnemonic: {}", e)))?;
        let seed = mnemonic.to_seed("");

        // Use first 32 bytes for the Ed25519 secret
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[0..32]);
        let signing_key = SigningKey::from_bytes(&secret);

        Ok(KeyPair { signing_key })
    }

    /// Sign a message with the private key
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Verify a signature against a message using this keypair's public key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.signing_key.verifying_key().verify(message, signature).is_ok()
    }

    /// Get the public key
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign a message and return hex string
    pub fn sign_hex(&self, message: &[u8]) -> String {
        let signature = self.sign(message);
        hex::encode(signature.to_bytes())
    }

    /// Get public key as hex string
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key().to_bytes())
    }
}

/// Verify a signature against a message with a provided public key (hex)
pub fn verify_with_pubkey_hex(message: &[u8], signature_hex: &str, pubkey_hex: &str) -> bool {
    let (Ok(sig_bytes), Ok(pk_bytes)) = (hex::decode(signature_hex), hex::decode(pubkey_hex)) else {
        return false;
    };
    let Ok(pk_array) = <[u8; 32]>::try_from(pk_bytes.as_slice()) else {
        return false;
    };
    if let (Ok(signature), Ok(pubkey)) = (
        Signature::from_slice(&sig_bytes),
        VerifyingKey::from_bytes(&pk_array),
    ) {
        return pubkey.verify(message, &signature).is_ok();
    }
    false
}
