//! Turns selected tokens into ready-to-sign contract calls.

use alloy_primitives::U256;
use chain_eth::address::normalize_address;
use chain_eth::chains::SupportedChain;
use chain_eth::units::{format_units, parse_units};
use tracing::{debug, warn};

use crate::error::WithdrawalError;
use crate::routes::{resolve_route, DispersalMode};
use crate::types::{ContractCallDescriptor, TokenWithdrawalRequest};

/// Everything the builder decided for one withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalPlan {
    pub chain: SupportedChain,
    pub mode: DispersalMode,
    pub descriptors: Vec<ContractCallDescriptor>,
    /// Tokens dropped because the chain can only move one token per call.
    pub ignored_tokens: Vec<String>,
}

/// Builds the contract calls that withdraw `tokens` to `destination` on
/// `chain_id`.
///
/// On Disperse chains every token gets its own `disperseTokenSimple` call
/// through the route contract. On other chains only the first token is
/// used, as an ERC-20 `transfer` on the token contract.
pub fn build_withdrawal_requests(
    tokens: &[TokenWithdrawalRequest],
    destination: &str,
    chain_id: u64,
) -> Result<Vec<ContractCallDescriptor>, WithdrawalError> {
    plan_withdrawal(tokens, destination, chain_id).map(|plan| plan.descriptors)
}

/// Like [`build_withdrawal_requests`], but also reports the route taken and
/// any tokens that were left out.
pub fn plan_withdrawal(
    tokens: &[TokenWithdrawalRequest],
    destination: &str,
    chain_id: u64,
) -> Result<WithdrawalPlan, WithdrawalError> {
    let route = resolve_route(chain_id)?;
    let destination = checked_address(destination)?;

    let Some((first, rest)) = tokens.split_first() else {
        return Err(WithdrawalError::NoTokens);
    };

    match route.mode {
        DispersalMode::MultiToken => {
            let contract = checked_address(route.contract_address)?;
            let descriptors = tokens
                .iter()
                .map(|token| {
                    let (token_address, value) = scale_token(token)?;
                    Ok(ContractCallDescriptor::disperse_token_simple(
                        contract.clone(),
                        token_address,
                        destination.clone(),
                        value,
                    ))
                })
                .collect::<Result<Vec<_>, WithdrawalError>>()?;

            Ok(WithdrawalPlan {
                chain: route.chain,
                mode: route.mode,
                descriptors,
                ignored_tokens: Vec::new(),
            })
        }
        DispersalMode::SingleToken => {
            let (token_address, value) = scale_token(first)?;
            let ignored_tokens: Vec<String> = rest.iter().map(|t| t.token_address.clone()).collect();

            if !ignored_tokens.is_empty() {
                warn!(
                    chain = %route.chain,
                    ignored = ignored_tokens.len(),
                    "chain supports one token per withdrawal; only {token_address} will be sent"
                );
            }

            Ok(WithdrawalPlan {
                chain: route.chain,
                mode: route.mode,
                descriptors: vec![ContractCallDescriptor::erc20_transfer(
                    token_address,
                    destination,
                    value,
                )],
                ignored_tokens,
            })
        }
    }
}

fn checked_address(address: &str) -> Result<String, WithdrawalError> {
    normalize_address(address).map_err(|e| WithdrawalError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Validates the token address and converts its amount to base units.
fn scale_token(token: &TokenWithdrawalRequest) -> Result<(String, U256), WithdrawalError> {
    let token_address = checked_address(&token.token_address)?;
    let decimals = token.decimals_or_default();

    let value = parse_units(&token.amount, decimals).map_err(|e| WithdrawalError::AmountParse {
        token: token_address.clone(),
        amount: token.amount.clone(),
        reason: e.to_string(),
    })?;

    debug!(
        token = %token_address,
        amount = %format_units(value, decimals),
        decimals,
        "scaled withdrawal amount"
    );
    Ok((token_address, value))
}
