//! Maps raw gateway result codes and wallet failure kinds onto the
//! user-facing error taxonomy.

use crate::error::SextantError;
use crate::wallet::WalletError;

pub const OP_LOW_RESERVE: &str = "op_low_reserve";
pub const OP_LINE_FULL: &str = "op_line_full";

/// Classify the first operation result code of a rejected submission.
pub fn classify_result_code(code: &str) -> SextantError {
    match code {
        OP_LOW_RESERVE => SextantError::InsufficientReserve,
        OP_LINE_FULL => SextantError::DuplicateTrustline,
        other => SextantError::UnclassifiedLedgerError(other.to_string()),
    }
}

/// Classify a structured wallet failure. Only kinds without a structured
/// meaning fall back to Unclassified.
pub fn classify_wallet_error(err: WalletError) -> SextantError {
    match err {
        WalletError::NotConnected => SextantError::WalletNotConnected,
        WalletError::NoAddress => SextantError::IdentityUnavailable,
        WalletError::Rejected => SextantError::UserRejectedSigning,
        WalletError::WrongNetwork(passphrase) => SextantError::Unclassified(format!(
            "Wallet refused to sign for network: {}",
            passphrase
        )),
        WalletError::Unavailable(msg) => SextantError::Unclassified(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_code_classification() {
        assert!(matches!(
            classify_result_code("op_low_reserve"),
            SextantError::InsufficientReserve
        ));
        assert!(matches!(
            classify_result_code("op_line_full"),
            SextantError::DuplicateTrustline
        ));
        assert!(matches!(
            classify_result_code("op_no_issuer"),
            SextantError::UnclassifiedLedgerError(code) if code == "op_no_issuer"
        ));
    }

    #[test]
    fn test_wallet_kind_classification() {
        assert!(matches!(
            classify_wallet_error(WalletError::NotConnected),
            SextantError::WalletNotConnected
        ));
        assert!(matches!(
            classify_wallet_error(WalletError::Rejected),
            SextantError::UserRejectedSigning
        ));
        assert!(matches!(
            classify_wallet_error(WalletError::NoAddress),
            SextantError::IdentityUnavailable
        ));
        assert!(matches!(
            classify_wallet_error(WalletError::Unavailable("gone".to_string())),
            SextantError::Unclassified(_)
        ));
    }
}
