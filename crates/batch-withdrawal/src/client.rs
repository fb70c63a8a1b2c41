//! Seams to the wallet and the chain.
//!
//! The executor only talks to these traits, so a browser wallet bridge, a
//! hardware signer, or [`crate::signer::LocalWallet`] can be plugged in.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::ContractCallDescriptor;

/// A connected wallet able to sign and submit contract calls.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Chain the wallet is currently connected to, if known.
    fn chain_id(&self) -> Option<u64>;

    /// The active signing account, or `None` when no account is connected.
    fn account(&self) -> Option<String>;

    /// Signs and submits `call`, returning the transaction hash.
    ///
    /// A user declining to sign should be reported as
    /// [`ClientError::UserRejected`] (or EIP-1193 code 4001).
    async fn write_contract(&self, call: &ContractCallDescriptor) -> Result<String, ClientError>;
}

/// Read access to chain state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Deployed bytecode at `address`; empty for externally owned accounts.
    async fn get_bytecode(&self, address: &str) -> Result<Vec<u8>, ClientError>;
}
