use thiserror::Error;

#[derive(Error, Debug)]
pub enum SextantError {
    #[error("Wallet is not connected")]
    WalletNotConnected,
    #[error("Wallet returned no account identifier")]
    IdentityUnavailable,
    #[error("Signing request was declined in the wallet")]
    UserRejectedSigning,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Account {0} not found on the network")]
    AccountNotFound(String),
    #[error("Insufficient reserve to add a trustline")]
    InsufficientReserve,
    #[error("Trustline already exists on the ledger")]
    DuplicateTrustline,
    #[error("Ledger rejected the transaction: {0}")]
    UnclassifiedLedgerError(String),
    #[error("Mirror store error: {0}")]
    MirrorStoreError(String),
    #[error("A submission for this account and asset is already in flight")]
    SubmissionInFlight,
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Key error: {0}")]
    KeyError(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Unclassified error: {0}")]
    Unclassified(String),
}
