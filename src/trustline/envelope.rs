//! Change-trust transaction envelopes and their wire encoding.
//!
//! An envelope carries exactly one change-trust operation, a network-standard
//! base fee and a bounded validity window, so a submission either applies or
//! is rejected by the network within the window.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::str::FromStr;

use crate::crypto::{self, KeyPair};
use crate::encoding::CanonicalSerialize;
use crate::error::SextantError;
use crate::trustline::types::Asset;

/// Network-standard base fee, in the smallest native unit.
pub const BASE_FEE: u64 = 100;

/// Operation type tag for change-trust in the canonical encoding.
const OP_CHANGE_TRUST: u8 = 6;

/// Validity window of an envelope. The network rejects the transaction once
/// `max_time` has passed; no client-side timeout exists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// A single change-of-trust operation: allow the source account to hold up
/// to `limit` of `asset`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChangeTrustOp {
    pub asset: Asset,
    pub limit: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub source_account: String,
    pub sequence: u64,
    pub fee: u64,
    pub time_bounds: TimeBounds,
    pub operations: Vec<ChangeTrustOp>,
}

impl CanonicalSerialize for ChangeTrustOp {
    fn canonical_serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        OP_CHANGE_TRUST.canonical_serialize(writer)?;
        self.asset.code.canonical_serialize(writer)?;
        self.asset.issuer.canonical_serialize(writer)?;
        self.limit.canonical_serialize(writer)
    }
}

impl CanonicalSerialize for TransactionEnvelope {
    fn canonical_serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.source_account.canonical_serialize(writer)?;
        self.sequence.canonical_serialize(writer)?;
        self.fee.canonical_serialize(writer)?;
        self.time_bounds.min_time.canonical_serialize(writer)?;
        self.time_bounds.max_time.canonical_serialize(writer)?;
        self.operations.canonical_serialize(writer)
    }
}

/// Validate a trust limit string. The wire format carries limits as decimal
/// strings; the network rejects zero and negative limits.
pub fn parse_limit(limit: &str) -> Result<Decimal, SextantError> {
    let value = Decimal::from_str(limit)
        .map_err(|_| SextantError::InvalidState(format!("Invalid trust limit: {}", limit)))?;
    if value <= Decimal::ZERO {
        return Err(SextantError::InvalidState(format!(
            "Trust limit must be positive: {}",
            limit
        )));
    }
    Ok(value)
}

impl TransactionEnvelope {
    /// Build a single-operation change-trust envelope. `now` is the current
    /// unix time in seconds; the validity window is [now, now + window_secs].
    pub fn change_trust(
        source_account: &str,
        sequence: u64,
        asset: Asset,
        limit: &str,
        fee: u64,
        window_secs: u64,
        now: u64,
    ) -> Result<Self, SextantError> {
        parse_limit(limit)?;
        Ok(TransactionEnvelope {
            source_account: source_account.to_string(),
            sequence,
            fee,
            time_bounds: TimeBounds {
                min_time: now,
                max_time: now + window_secs,
            },
            operations: vec![ChangeTrustOp {
                asset,
                limit: limit.to_string(),
            }],
        })
    }

    /// The bytes a signing agent signs: SHA-256 of the network identifier
    /// (itself the hash of the passphrase) followed by the canonical
    /// envelope bytes. Scoping by network id means a signature for one
    /// network is invalid on every other.
    pub fn signing_payload(&self, network_passphrase: &str) -> Vec<u8> {
        let network_id = Sha256::digest(network_passphrase.as_bytes());
        let mut hasher = Sha256::new();
        hasher.update(network_id);
        hasher.update(self.to_bytes());
        hasher.finalize().to_vec()
    }

    /// Transaction hash on the given network, as a 64-char hex string.
    pub fn hash_hex(&self, network_passphrase: &str) -> String {
        hex::encode(self.signing_payload(network_passphrase))
    }

    /// Hex wire encoding of the unsigned envelope.
    pub fn encode(&self) -> Result<String, SextantError> {
        let bytes = bincode::serialize(self)
            .map_err(|e| SextantError::SerializationError(e.to_string()))?;
        Ok(hex::encode(bytes))
    }

    pub fn decode(encoded: &str) -> Result<Self, SextantError> {
        let bytes = hex::decode(encoded)
            .map_err(|e| SextantError::SerializationError(e.to_string()))?;
        bincode::deserialize(&bytes).map_err(|e| SextantError::SerializationError(e.to_string()))
    }

    /// Sign the envelope for the given network.
    pub fn sign(&self, keypair: &KeyPair, network_passphrase: &str) -> SignedEnvelope {
        let payload = self.signing_payload(network_passphrase);
        SignedEnvelope {
            envelope: self.clone(),
            public_key: keypair.public_key_hex(),
            signature: keypair.sign_hex(&payload),
        }
    }
}

/// An envelope plus the signature produced by the signing agent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub envelope: TransactionEnvelope,
    pub public_key: String,
    pub signature: String,
}

impl SignedEnvelope {
    /// Hex wire encoding, submitted to the gateway as the `tx` form field.
    pub fn encode(&self) -> Result<String, SextantError> {
        let bytes = bincode::serialize(self)
            .map_err(|e| SextantError::SerializationError(e.to_string()))?;
        Ok(hex::encode(bytes))
    }

    pub fn decode(encoded: &str) -> Result<Self, SextantError> {
        let bytes = hex::decode(encoded)
            .map_err(|e| SextantError::SerializationError(e.to_string()))?;
        bincode::deserialize(&bytes).map_err(|e| SextantError::SerializationError(e.to_string()))
    }

    /// Verify the signature against the envelope on the given network.
    pub fn verify(&self, network_passphrase: &str) -> bool {
        let payload = self.envelope.signing_payload(network_passphrase);
        crypto::verify_with_pubkey_hex(&payload, &self.signature, &self.public_key)
    }
}
