use std::fmt;

use chain_eth::error::EthError;
use thiserror::Error;

/// Steps of a single withdrawal attempt, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalStage {
    Validating,
    Building,
    Verifying,
    Submitting,
}

impl fmt::Display for WithdrawalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WithdrawalStage::Validating => "validating",
            WithdrawalStage::Building => "building",
            WithdrawalStage::Verifying => "verifying",
            WithdrawalStage::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

/// Every way a withdrawal can fail. The `Display` text is the message shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    #[error("Wallet connection error: Missing required client")]
    MissingClient,

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Missing destination address")]
    MissingDestination,

    #[error("No tokens specified for withdrawal")]
    NoTokens,

    #[error("Batch withdrawals not supported on chain ID {0}")]
    UnsupportedChain(u64),

    #[error("Batch withdrawals have no configured contract for chain ID {0}")]
    ContractNotConfigured(u64),

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Cannot process amount \"{amount}\" for token {token}. Please ensure it's a valid number.")]
    AmountParse {
        token: String,
        amount: String,
        reason: String,
    },

    #[error(
        "The address {} is not a valid contract on this network. Transaction aborted to protect your funds.",
        short_address(.address)
    )]
    NotAContract { address: String },

    #[error("Failed to verify contract: {0}. Transaction aborted to protect your funds.")]
    VerificationFailed(String),

    #[error("Transaction was rejected by user")]
    UserRejected,

    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl WithdrawalError {
    /// The stage that produced this error.
    pub fn stage(&self) -> WithdrawalStage {
        match self {
            WithdrawalError::MissingClient
            | WithdrawalError::WalletNotConnected
            | WithdrawalError::MissingDestination
            | WithdrawalError::NoTokens => WithdrawalStage::Validating,
            WithdrawalError::UnsupportedChain(_)
            | WithdrawalError::ContractNotConfigured(_)
            | WithdrawalError::InvalidAddress { .. }
            | WithdrawalError::AmountParse { .. } => WithdrawalStage::Building,
            WithdrawalError::NotAContract { .. } | WithdrawalError::VerificationFailed(_) => {
                WithdrawalStage::Verifying
            }
            WithdrawalError::UserRejected | WithdrawalError::Wallet(_) => WithdrawalStage::Submitting,
        }
    }

    /// Whether the user cancelled, as opposed to something going wrong.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WithdrawalError::UserRejected)
    }
}

/// Shortens an address to `0xABCD...WXYZ` for display.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_char_boundary(6) || !address.is_char_boundary(address.len() - 4) {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// EIP-1193 provider error code for "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors reported by wallet and chain-reader clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("user rejected the request: {0}")]
    UserRejected(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Eth(#[from] EthError),

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Whether the wallet is signalling that the user declined to sign.
    ///
    /// Wallets disagree on how they report this, so besides the explicit
    /// variant and the EIP-1193 code, any message mentioning "rejected" counts.
    pub fn is_user_rejection(&self) -> bool {
        match self {
            ClientError::UserRejected(_) => true,
            ClientError::Rpc { code, .. } if *code == USER_REJECTED_CODE => true,
            other => other.to_string().to_lowercase().contains("rejected"),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

/// Errors loading a [`crate::config::WithdrawalConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages() {
        assert_eq!(
            WithdrawalError::MissingClient.to_string(),
            "Wallet connection error: Missing required client"
        );
        assert_eq!(WithdrawalError::WalletNotConnected.to_string(), "Wallet not connected");
        assert_eq!(WithdrawalError::MissingDestination.to_string(), "Missing destination address");
        assert_eq!(WithdrawalError::NoTokens.to_string(), "No tokens specified for withdrawal");
    }

    #[test]
    fn route_messages() {
        assert_eq!(
            WithdrawalError::UnsupportedChain(5).to_string(),
            "Batch withdrawals not supported on chain ID 5"
        );
        assert_eq!(
            WithdrawalError::ContractNotConfigured(10).to_string(),
            "Batch withdrawals have no configured contract for chain ID 10"
        );
    }

    #[test]
    fn amount_parse_names_token() {
        let err = WithdrawalError::AmountParse {
            token: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into(),
            amount: "abc".into(),
            reason: "not a number".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot process amount \"abc\" for token 0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48. \
             Please ensure it's a valid number."
        );
    }

    #[test]
    fn not_a_contract_truncates_address() {
        let err = WithdrawalError::NotAContract {
            address: "0xD152f549545093347A162Dce210e7293f1452150".into(),
        };
        assert_eq!(
            err.to_string(),
            "The address 0xD152...2150 is not a valid contract on this network. \
             Transaction aborted to protect your funds."
        );
    }

    #[test]
    fn verification_and_wallet_messages() {
        assert_eq!(
            WithdrawalError::VerificationFailed("timeout".into()).to_string(),
            "Failed to verify contract: timeout. Transaction aborted to protect your funds."
        );
        assert_eq!(WithdrawalError::UserRejected.to_string(), "Transaction was rejected by user");
        assert_eq!(
            WithdrawalError::Wallet("nonce too low".into()).to_string(),
            "Wallet error: nonce too low"
        );
    }

    #[test]
    fn stages_follow_taxonomy() {
        assert_eq!(WithdrawalError::NoTokens.stage(), WithdrawalStage::Validating);
        assert_eq!(WithdrawalError::UnsupportedChain(5).stage(), WithdrawalStage::Building);
        assert_eq!(
            WithdrawalError::VerificationFailed(String::new()).stage(),
            WithdrawalStage::Verifying
        );
        assert_eq!(WithdrawalError::UserRejected.stage(), WithdrawalStage::Submitting);
    }

    #[test]
    fn short_address_leaves_short_strings_alone() {
        assert_eq!(short_address("0x1234"), "0x1234");
        assert_eq!(short_address("0x1234567890abcdef"), "0x1234...cdef");
    }

    #[test]
    fn user_rejection_detection() {
        assert!(ClientError::UserRejected("denied".into()).is_user_rejection());
        assert!(ClientError::Rpc { code: 4001, message: "User denied".into() }.is_user_rejection());
        assert!(ClientError::Other("User rejected the request.".into()).is_user_rejection());
        assert!(!ClientError::Rpc { code: -32000, message: "nonce too low".into() }.is_user_rejection());
        assert!(!ClientError::Transport("connection refused".into()).is_user_rejection());
    }

    #[test]
    fn eth_errors_convert_transparently() {
        let err: ClientError = EthError::SigningError("bad key".into()).into();
        assert_eq!(err.to_string(), "signing error: bad key");
    }
}
