//! Runs one withdrawal: validate, build, verify, submit.

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::builder::build_withdrawal_requests;
use crate::client::{ChainReader, WalletClient};
use crate::config::WithdrawalConfig;
use crate::error::{WithdrawalError, WithdrawalStage};
use crate::types::{ContractCallDescriptor, TokenWithdrawalRequest, WithdrawalOutcome};

/// Orchestrates a single-transaction withdrawal.
///
/// Exactly one transaction is submitted per call to [`execute`]; on
/// Disperse chains that is the first token's dispersal call. Nothing is
/// retried here: resubmitting after a rejection is the caller's decision.
///
/// [`execute`]: WithdrawalExecutor::execute
#[derive(Debug, Clone, Default)]
pub struct WithdrawalExecutor {
    config: WithdrawalConfig,
}

impl WithdrawalExecutor {
    pub fn new(config: WithdrawalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WithdrawalConfig {
        &self.config
    }

    /// Withdraws `tokens` to `destination`. Never fails: every error is
    /// returned as [`WithdrawalOutcome::Failed`].
    pub async fn execute(
        &self,
        tokens: &[TokenWithdrawalRequest],
        destination: &str,
        wallet: Option<&dyn WalletClient>,
        reader: Option<&dyn ChainReader>,
    ) -> WithdrawalOutcome {
        let outcome: WithdrawalOutcome = self.run(tokens, destination, wallet, reader).await.into();

        match outcome.error() {
            None => {}
            Some(err) if err.is_user_rejection() => warn!("withdrawal cancelled by user"),
            Some(err) => error!(stage = %err.stage(), "withdrawal failed: {err}"),
        }
        outcome
    }

    async fn run(
        &self,
        tokens: &[TokenWithdrawalRequest],
        destination: &str,
        wallet: Option<&dyn WalletClient>,
        reader: Option<&dyn ChainReader>,
    ) -> Result<String, WithdrawalError> {
        let (Some(wallet), Some(reader)) = (wallet, reader) else {
            return Err(WithdrawalError::MissingClient);
        };
        let account = wallet.account().ok_or(WithdrawalError::WalletNotConnected)?;
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(WithdrawalError::MissingDestination);
        }
        if tokens.is_empty() {
            return Err(WithdrawalError::NoTokens);
        }

        let chain_id = wallet.chain_id().unwrap_or(self.config.default_chain_id);
        let span = info_span!("batch_withdrawal", chain_id, tokens = tokens.len(), %account);

        async move {
            info!(stage = %WithdrawalStage::Building, %destination, "processing batch withdrawal");
            for (index, token) in tokens.iter().enumerate() {
                debug!(index, token = %token.token_address, amount = %token.amount, "requested token");
            }

            let calls = build_withdrawal_requests(tokens, destination, chain_id)?;
            let Some(call) = calls.into_iter().next() else {
                return Err(WithdrawalError::NoTokens);
            };

            self.verify_contract(reader, &call).await?;
            self.submit(wallet, &call).await
        }
        .instrument(span)
        .await
    }

    /// Refuses to continue unless code is deployed at the call target.
    async fn verify_contract(
        &self,
        reader: &dyn ChainReader,
        call: &ContractCallDescriptor,
    ) -> Result<(), WithdrawalError> {
        debug!(stage = %WithdrawalStage::Verifying, target = %call.address, "checking target bytecode");

        match reader.get_bytecode(&call.address).await {
            Ok(code) if code.is_empty() => Err(WithdrawalError::NotAContract {
                address: call.address.clone(),
            }),
            Ok(code) => {
                info!(target = %call.address, bytes = code.len(), "contract verification successful");
                Ok(())
            }
            Err(e) => Err(WithdrawalError::VerificationFailed(e.to_string())),
        }
    }

    async fn submit(
        &self,
        wallet: &dyn WalletClient,
        call: &ContractCallDescriptor,
    ) -> Result<String, WithdrawalError> {
        let delay = self.config.submit_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        info!(stage = %WithdrawalStage::Submitting, function = call.function_name, "sending transaction to wallet for approval");

        match wallet.write_contract(call).await {
            Ok(hash) => {
                info!(%hash, "transaction submitted");
                Ok(hash)
            }
            Err(e) if e.is_user_rejection() => Err(WithdrawalError::UserRejected),
            Err(e) => Err(WithdrawalError::Wallet(e.to_string())),
        }
    }
}
