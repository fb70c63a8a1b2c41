//! A [`WalletClient`] backed by a raw secp256k1 key and a JSON-RPC node.

use std::fmt;

use async_trait::async_trait;
use chain_eth::address::private_key_to_address;
use chain_eth::transaction::{build_contract_call, sign_transaction, FeeParams, SignedEthTransaction};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::client::WalletClient;
use crate::config::WithdrawalConfig;
use crate::error::ClientError;
use crate::rpc::JsonRpcClient;
use crate::types::ContractCallDescriptor;

/// Signs locally and broadcasts through a node.
///
/// Nonce, fees and gas are fetched from the node for every submission.
/// `maxFeePerGas` is set to twice the latest base fee plus the tip.
pub struct LocalWallet {
    private_key: Zeroizing<[u8; 32]>,
    address: String,
    chain_id: u64,
    rpc: JsonRpcClient,
    gas_limit_multiplier_percent: u64,
}

impl LocalWallet {
    pub fn new(private_key: [u8; 32], chain_id: u64, rpc: JsonRpcClient) -> Result<Self, ClientError> {
        let private_key = Zeroizing::new(private_key);
        let address = private_key_to_address(&private_key)?;

        Ok(Self {
            private_key,
            address,
            chain_id,
            rpc,
            gas_limit_multiplier_percent: WithdrawalConfig::default().gas_limit_multiplier_percent,
        })
    }

    /// Builds a wallet whose node client and gas padding come from `config`.
    pub fn from_config(
        key_hex: &str,
        chain_id: u64,
        rpc_url: &str,
        config: &WithdrawalConfig,
    ) -> Result<Self, ClientError> {
        let rpc = JsonRpcClient::from_config(rpc_url, config);
        Ok(Self::from_hex_key(key_hex, chain_id, rpc)?
            .with_gas_limit_multiplier(config.gas_limit_multiplier_percent))
    }

    /// Builds a wallet from a 0x-prefixed or bare hex private key.
    pub fn from_hex_key(key_hex: &str, chain_id: u64, rpc: JsonRpcClient) -> Result<Self, ClientError> {
        let digits = key_hex.trim().trim_start_matches("0x");
        let bytes = Zeroizing::new(
            hex::decode(digits).map_err(|e| ClientError::Other(format!("invalid private key hex: {e}")))?,
        );

        let mut key = [0u8; 32];
        if bytes.len() != key.len() {
            return Err(ClientError::Other(format!(
                "private key must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        key.copy_from_slice(&bytes);

        Self::new(key, chain_id, rpc)
    }

    /// Gas limit as a percentage of the node's estimate (default 120).
    pub fn with_gas_limit_multiplier(mut self, percent: u64) -> Self {
        self.gas_limit_multiplier_percent = percent.max(100);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Builds and signs `call` with explicit fee parameters, without touching
    /// the network.
    pub fn sign_call(&self, call: &ContractCallDescriptor, fees: FeeParams) -> Result<SignedEthTransaction, ClientError> {
        let tx = build_contract_call(self.chain_id, &call.address, call.calldata()?, fees)?;
        Ok(sign_transaction(&tx, &self.private_key)?)
    }

    fn padded_gas_limit(&self, estimate: u64) -> u64 {
        let padded = u128::from(estimate) * u128::from(self.gas_limit_multiplier_percent) / 100;
        u64::try_from(padded).unwrap_or(u64::MAX)
    }
}

impl fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("rpc", &self.rpc.url())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletClient for LocalWallet {
    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn account(&self) -> Option<String> {
        Some(self.address.clone())
    }

    async fn write_contract(&self, call: &ContractCallDescriptor) -> Result<String, ClientError> {
        let calldata = call.calldata()?;

        let nonce = self.rpc.transaction_count(&self.address).await?;
        let priority_fee = self.rpc.max_priority_fee_per_gas().await?;
        let base_fee = self.rpc.base_fee_per_gas().await?;
        let estimate = self.rpc.estimate_gas(&self.address, &call.address, &calldata).await?;

        let fees = FeeParams {
            nonce,
            max_priority_fee_per_gas: priority_fee,
            max_fee_per_gas: base_fee.saturating_mul(2).saturating_add(priority_fee),
            gas_limit: self.padded_gas_limit(estimate),
        };
        let signed = self.sign_call(call, fees)?;

        let hash = self.rpc.send_raw_transaction(&signed.raw_tx).await?;
        if !hash.eq_ignore_ascii_case(&signed.tx_hash) {
            warn!(node = %hash, local = %signed.tx_hash, "node reported a different transaction hash");
        }
        info!(%hash, nonce, gas_limit = fees.gas_limit, "broadcast signed withdrawal");

        Ok(hash)
    }
}
