use alloy_primitives::U256;
use chain_eth::erc20;
use chain_eth::error::EthError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::WithdrawalError;

/// Decimal count assumed when a token request does not state one.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Human-readable ABI of the Disperse dispersal function.
pub const DISPERSE_TOKEN_SIMPLE_ABI: &str =
    "function disperseTokenSimple(address token, address[] recipients, uint256[] values)";

/// Human-readable ABI of ERC-20 `transfer`.
pub const ERC20_TRANSFER_ABI: &str = "function transfer(address to, uint256 value) returns (bool)";

/// One token the user selected for withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWithdrawalRequest {
    /// Token contract address.
    #[serde(rename = "address")]
    pub token_address: String,
    /// Amount as typed by the user, e.g. `"1.5"`.
    pub amount: String,
    /// Token decimals. Callers should always supply this; the 18 fallback
    /// mis-encodes tokens such as 6-decimal USDC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl TokenWithdrawalRequest {
    pub fn new(token_address: impl Into<String>, amount: impl Into<String>, decimals: Option<u8>) -> Self {
        Self {
            token_address: token_address.into(),
            amount: amount.into(),
            decimals,
        }
    }

    pub fn decimals_or_default(&self) -> u8 {
        self.decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }
}

/// Arguments of the contract functions a withdrawal can call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgs {
    /// `disperseTokenSimple(token, recipients, values)`.
    DisperseTokenSimple {
        token: String,
        recipients: Vec<String>,
        values: Vec<U256>,
    },
    /// ERC-20 `transfer(to, value)`.
    Transfer { to: String, value: U256 },
}

/// A ready-to-sign contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCallDescriptor {
    /// Checksummed address of the contract being called.
    pub address: String,
    pub abi_fragment: &'static str,
    pub function_name: &'static str,
    pub args: CallArgs,
}

impl ContractCallDescriptor {
    /// A dispersal through `contract` sending `value` of `token` to one recipient.
    pub fn disperse_token_simple(
        contract: impl Into<String>,
        token: impl Into<String>,
        recipient: impl Into<String>,
        value: U256,
    ) -> Self {
        Self {
            address: contract.into(),
            abi_fragment: DISPERSE_TOKEN_SIMPLE_ABI,
            function_name: "disperseTokenSimple",
            args: CallArgs::DisperseTokenSimple {
                token: token.into(),
                recipients: vec![recipient.into()],
                values: vec![value],
            },
        }
    }

    /// A plain ERC-20 transfer, sent to the token contract itself.
    pub fn erc20_transfer(token: impl Into<String>, to: impl Into<String>, value: U256) -> Self {
        Self {
            address: token.into(),
            abi_fragment: ERC20_TRANSFER_ABI,
            function_name: "transfer",
            args: CallArgs::Transfer { to: to.into(), value },
        }
    }

    /// ABI-encoded calldata for this call.
    pub fn calldata(&self) -> Result<Vec<u8>, EthError> {
        match &self.args {
            CallArgs::DisperseTokenSimple {
                token,
                recipients,
                values,
            } => erc20::encode_disperse_token_simple(token, recipients, values),
            CallArgs::Transfer { to, value } => erc20::encode_transfer(to, *value),
        }
    }
}

/// Final result of one withdrawal attempt.
///
/// Serializes as `{"hash": "0x…"}` or `{"error": "…"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalOutcome {
    Submitted { hash: String },
    Failed { error: WithdrawalError },
}

impl WithdrawalOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, WithdrawalOutcome::Submitted { .. })
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            WithdrawalOutcome::Submitted { hash } => Some(hash),
            WithdrawalOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&WithdrawalError> {
        match self {
            WithdrawalOutcome::Submitted { .. } => None,
            WithdrawalOutcome::Failed { error } => Some(error),
        }
    }

    /// The user-facing error text, if the withdrawal failed.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

impl From<Result<String, WithdrawalError>> for WithdrawalOutcome {
    fn from(result: Result<String, WithdrawalError>) -> Self {
        match result {
            Ok(hash) => WithdrawalOutcome::Submitted { hash },
            Err(error) => WithdrawalOutcome::Failed { error },
        }
    }
}

impl Serialize for WithdrawalOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            WithdrawalOutcome::Submitted { hash } => map.serialize_entry("hash", hash)?,
            WithdrawalOutcome::Failed { error } => map.serialize_entry("error", &error.to_string())?,
        }
        map.end()
    }
}
