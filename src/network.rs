//! Built-in table of Ethereum-family networks.

use std::fmt;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthereumNetwork {
    pub name: &'static str,
    pub shortcut: &'static str,
    pub chain_id: u64,
}

pub const NETWORKS: &[EthereumNetwork] = &[
    EthereumNetwork { name: "Ethereum", shortcut: "eth", chain_id: 1 },
    EthereumNetwork { name: "Ethereum Classic", shortcut: "etc", chain_id: 61 },
    EthereumNetwork { name: "Ethereum Testnet Ropsten", shortcut: "trop", chain_id: 3 },
    EthereumNetwork { name: "Ethereum Testnet Rinkeby", shortcut: "trin", chain_id: 4 },
    EthereumNetwork { name: "Ethereum Classic Testnet", shortcut: "tetc", chain_id: 62 },
];

impl fmt::Display for EthereumNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.shortcut)
    }
}

/// Resolves a coin identifier by shortcut or full name, ignoring case.
pub fn get_ethereum_network(coin: &str) -> Result<EthereumNetwork, ConfigurationError> {
    let wanted = coin.trim().to_lowercase();
    NETWORKS
        .iter()
        .find(|n| n.shortcut == wanted || n.name.to_lowercase() == wanted)
        .copied()
        .ok_or_else(|| ConfigurationError::UnknownNetwork(coin.to_string()))
}
