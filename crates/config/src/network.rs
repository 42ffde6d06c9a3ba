//! Network configuration for the mock deployments.
//!
//! Provides chain ids and block times of the development networks the mocks
//! are deployed to (nitro testnode, anvil).

use serde::{Deserialize, Serialize};

/// Network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Nitro testnode (L1 geth devnet + L2 sequencer)
    Testnode,
    /// Single anvil instance serving as both layers
    Anvil,
}

/// Chain parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds
    pub block_time_secs: u64,
}

impl ChainConfig {
    /// Testnode L1 devnet.
    pub const fn testnode_l1() -> Self {
        Self {
            chain_id: 1337,
            block_time_secs: 1,
        }
    }

    /// Testnode L2 chain.
    pub const fn testnode_l2() -> Self {
        Self {
            chain_id: 412346,
            block_time_secs: 1,
        }
    }

    /// Anvil with its default chain id.
    pub const fn anvil() -> Self {
        Self {
            chain_id: 31337,
            block_time_secs: 1,
        }
    }
}

/// Complete network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_type: NetworkType,
    /// Parent chain, where bridge/inbox/challenge mocks live
    pub l1: ChainConfig,
    /// Child chain, where the L2 test contracts live
    pub l2: ChainConfig,
}

impl NetworkConfig {
    /// Nitro testnode configuration.
    pub const fn testnode() -> Self {
        Self {
            network_type: NetworkType::Testnode,
            l1: ChainConfig::testnode_l1(),
            l2: ChainConfig::testnode_l2(),
        }
    }

    /// Anvil configuration, both layers share the chain.
    pub const fn anvil() -> Self {
        Self {
            network_type: NetworkType::Anvil,
            l1: ChainConfig::anvil(),
            l2: ChainConfig::anvil(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Testnode => Self::testnode(),
            NetworkType::Anvil => Self::anvil(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_type: NetworkType,
    l1: ChainConfig,
    l2: ChainConfig,
}

impl NetworkConfigBuilder {
    /// Start with testnode defaults.
    pub const fn testnode() -> Self {
        Self {
            network_type: NetworkType::Testnode,
            l1: ChainConfig::testnode_l1(),
            l2: ChainConfig::testnode_l2(),
        }
    }

    /// Start with anvil defaults.
    pub const fn anvil() -> Self {
        Self {
            network_type: NetworkType::Anvil,
            l1: ChainConfig::anvil(),
            l2: ChainConfig::anvil(),
        }
    }

    /// Override the L1 chain id.
    pub const fn l1_chain_id(mut self, chain_id: u64) -> Self {
        self.l1.chain_id = chain_id;
        self
    }

    /// Override the L2 chain id.
    pub const fn l2_chain_id(mut self, chain_id: u64) -> Self {
        self.l2.chain_id = chain_id;
        self
    }

    /// Override the L1 block time.
    pub const fn l1_block_time(mut self, secs: u64) -> Self {
        self.l1.block_time_secs = secs;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        NetworkConfig {
            network_type: self.network_type,
            l1: self.l1,
            l2: self.l2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testnode_config() {
        let config = NetworkConfig::testnode();
        assert_eq!(config.l1.chain_id, 1337);
        assert_eq!(config.l2.chain_id, 412346);
        assert_eq!(config.network_type, NetworkType::Testnode);
    }

    #[test]
    fn test_anvil_config() {
        let config = NetworkConfig::from_network_type(NetworkType::Anvil);
        assert_eq!(config.l1, config.l2);
        assert_eq!(config.l1.chain_id, 31337);
    }

    #[test]
    fn test_custom_config_builder() {
        let config = NetworkConfigBuilder::testnode()
            .l1_chain_id(32382)
            .l1_block_time(12)
            .build();

        assert_eq!(config.l1.chain_id, 32382);
        assert_eq!(config.l1.block_time_secs, 12);
        assert_eq!(config.l2.chain_id, 412346);
        assert_eq!(config.network_type, NetworkType::Testnode);
    }

    #[test]
    fn test_network_type_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            network: NetworkType,
        }

        let parsed: Wrapper = toml::from_str("network = \"testnode\"").unwrap();
        assert_eq!(parsed.network, NetworkType::Testnode);
        assert!(toml::from_str::<Wrapper>("network = \"mainnet\"").is_err());
    }
}
