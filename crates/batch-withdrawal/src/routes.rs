//! Per-chain routing for withdrawals.
//!
//! Chains with a Disperse deployment send every selected token through one
//! contract; the rest fall back to a plain ERC-20 transfer of a single token.

use chain_eth::chains::SupportedChain;

use crate::error::WithdrawalError;

/// How a chain's route contract handles multiple tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispersalMode {
    /// `disperseTokenSimple` is available: one call per token.
    MultiToken,
    /// Only a standard ERC-20 `transfer` of the first token.
    SingleToken,
}

/// The batch-transfer contract configured for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainRoute {
    pub chain: SupportedChain,
    pub contract_address: &'static str,
    pub mode: DispersalMode,
}

const DISPERSE_APP: &str = "0xD152f549545093347A162Dce210e7293f1452150";
const GNOSIS_MULTISEND: &str = "0x7F00aF5a6261D1b0e87dC594E95D161982eb265D";
const POLYGON_DISPERSE_APP: &str = "0xb5c5F672F106A5CC1cE0D67b9a574C6a8e5E36cF";

/// Route table.
pub const fn route_for(chain: SupportedChain) -> ChainRoute {
    let (contract_address, mode) = match chain {
        SupportedChain::Ethereum => (DISPERSE_APP, DispersalMode::MultiToken),
        SupportedChain::Optimism => (DISPERSE_APP, DispersalMode::SingleToken),
        SupportedChain::Bsc => (DISPERSE_APP, DispersalMode::SingleToken),
        SupportedChain::Gnosis => (GNOSIS_MULTISEND, DispersalMode::SingleToken),
        SupportedChain::Polygon => (POLYGON_DISPERSE_APP, DispersalMode::MultiToken),
        SupportedChain::Arbitrum => (DISPERSE_APP, DispersalMode::SingleToken),
        SupportedChain::Avalanche => (DISPERSE_APP, DispersalMode::SingleToken),
    };
    ChainRoute {
        chain,
        contract_address,
        mode,
    }
}

// Every supported chain must carry a 0x-prefixed 20-byte contract address.
const _: () = {
    let mut i = 0;
    while i < SupportedChain::ALL.len() {
        let address = route_for(SupportedChain::ALL[i]).contract_address.as_bytes();
        assert!(address.len() == 42, "route contract must be a 42-character address");
        assert!(address[0] == b'0' && address[1] == b'x', "route contract must be 0x-prefixed");
        i += 1;
    }
};

/// Resolves the route for a numeric chain ID.
pub fn resolve_route(chain_id: u64) -> Result<ChainRoute, WithdrawalError> {
    let chain = SupportedChain::from_chain_id(chain_id).ok_or(WithdrawalError::UnsupportedChain(chain_id))?;
    let route = route_for(chain);

    if route.contract_address.is_empty() {
        return Err(WithdrawalError::ContractNotConfigured(chain_id));
    }

    Ok(route)
}

/// Chain IDs that accept withdrawals.
pub fn supported_chain_ids() -> Vec<u64> {
    SupportedChain::ALL.iter().map(|c| c.chain_id()).collect()
}
