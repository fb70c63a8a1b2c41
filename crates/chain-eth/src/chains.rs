use std::fmt;

/// The closed set of networks withdrawals can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedChain {
    Ethereum,
    Optimism,
    Bsc,
    Gnosis,
    Polygon,
    Arbitrum,
    Avalanche,
}

impl SupportedChain {
    /// Every supported network, in chain ID order.
    pub const ALL: [SupportedChain; 7] = [
        SupportedChain::Ethereum,
        SupportedChain::Optimism,
        SupportedChain::Bsc,
        SupportedChain::Gnosis,
        SupportedChain::Polygon,
        SupportedChain::Arbitrum,
        SupportedChain::Avalanche,
    ];

    /// Looks up a network by its numeric chain ID.
    pub const fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(SupportedChain::Ethereum),
            10 => Some(SupportedChain::Optimism),
            56 => Some(SupportedChain::Bsc),
            100 => Some(SupportedChain::Gnosis),
            137 => Some(SupportedChain::Polygon),
            42161 => Some(SupportedChain::Arbitrum),
            43114 => Some(SupportedChain::Avalanche),
            _ => None,
        }
    }

    pub const fn chain_id(self) -> u64 {
        match self {
            SupportedChain::Ethereum => 1,
            SupportedChain::Optimism => 10,
            SupportedChain::Bsc => 56,
            SupportedChain::Gnosis => 100,
            SupportedChain::Polygon => 137,
            SupportedChain::Arbitrum => 42161,
            SupportedChain::Avalanche => 43114,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SupportedChain::Ethereum => "Ethereum",
            SupportedChain::Optimism => "Optimism",
            SupportedChain::Bsc => "BNB Smart Chain",
            SupportedChain::Gnosis => "Gnosis Chain",
            SupportedChain::Polygon => "Polygon",
            SupportedChain::Arbitrum => "Arbitrum One",
            SupportedChain::Avalanche => "Avalanche C-Chain",
        }
    }
}

impl fmt::Display for SupportedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.chain_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_chain_ids_are_rejected() {
        assert!(SupportedChain::from_chain_id(999999).is_none());
        // Base is a valid EVM network but has no withdrawal route.
        assert!(SupportedChain::from_chain_id(8453).is_none());
    }

    #[test]
    fn chain_ids_round_trip_through_enum() {
        for chain in SupportedChain::ALL {
            assert_eq!(SupportedChain::from_chain_id(chain.chain_id()), Some(chain));
        }
    }

    #[test]
    fn supported_chain_ids_match_withdrawal_networks() {
        let ids: Vec<u64> = SupportedChain::ALL.iter().map(|c| c.chain_id()).collect();
        assert_eq!(ids, vec![1, 10, 56, 100, 137, 42161, 43114]);
    }

    #[test]
    fn display_includes_id() {
        assert_eq!(SupportedChain::Polygon.to_string(), "Polygon (137)");
        assert_eq!(SupportedChain::Gnosis.to_string(), "Gnosis Chain (100)");
    }
}
