//! Batch withdrawal of ERC-20 balances from a user wallet to a single
//! destination, using the Disperse contract where one is deployed and a
//! plain `transfer` elsewhere.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod routes;
pub mod rpc;
pub mod signer;
pub mod types;

pub use builder::{build_withdrawal_requests, plan_withdrawal, WithdrawalPlan};
pub use client::{ChainReader, WalletClient};
pub use config::WithdrawalConfig;
pub use error::{ClientError, ConfigError, WithdrawalError, WithdrawalStage};
pub use executor::WithdrawalExecutor;
pub use routes::{resolve_route, supported_chain_ids, ChainRoute, DispersalMode};
pub use rpc::JsonRpcClient;
pub use signer::LocalWallet;
pub use types::{ContractCallDescriptor, TokenWithdrawalRequest, WithdrawalOutcome};

// ─── Entry point ─────────────────────────────────────────────────────

/// Withdraws `tokens` to `destination` with the default configuration.
///
/// Returns `{ hash }` on submission or `{ error }` with a user-facing
/// message; this function itself never fails.
pub async fn batch_withdraw_tokens(
    tokens: &[TokenWithdrawalRequest],
    destination: &str,
    reader: Option<&dyn ChainReader>,
    wallet: Option<&dyn WalletClient>,
) -> WithdrawalOutcome {
    WithdrawalExecutor::default()
        .execute(tokens, destination, wallet, reader)
        .await
}
