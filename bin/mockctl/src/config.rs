use alloy_primitives::U256;
use binding::bridge::MaxTimeVariation;
use config::{MockAddresses, NetworkConfig, NetworkConfigBuilder, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level mockctl configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url of the chain the mocks live on
    pub rpc_url: String,

    /// Network preset
    #[serde(default = "default_network")]
    pub network: NetworkType,

    /// Override of the preset L2 chain id, used for the init message
    #[serde(default)]
    pub l2_chain_id: Option<u64>,

    /// Foundry `out/` directory holding the compiled mocks
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// Addresses of mocks deployed earlier
    #[serde(default)]
    pub mocks: MockAddresses,

    /// Blocks per `eth_getLogs` request, zero for the default
    #[serde(default)]
    pub scan_chunk_size: u64,

    /// Seconds between polls of `watch`
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Log actions without executing transactions
    #[serde(default)]
    pub dry_run: bool,

    /// Parameters of `deploy-stack`
    #[serde(default)]
    pub stack: StackConfig,
}

/// Sequencer inbox parameters used when deploying a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub max_data_size: u64,
    pub delay_blocks: u64,
    pub future_blocks: u64,
    pub delay_seconds: u64,
    pub future_seconds: u64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_data_size: 117_964,
            delay_blocks: 5_760,
            future_blocks: 12,
            delay_seconds: 86_400,
            future_seconds: 3_600,
        }
    }
}

impl StackConfig {
    pub fn max_time_variation(&self) -> MaxTimeVariation {
        MaxTimeVariation {
            delayBlocks: U256::from(self.delay_blocks),
            futureBlocks: U256::from(self.future_blocks),
            delaySeconds: U256::from(self.delay_seconds),
            futureSeconds: U256::from(self.future_seconds),
        }
    }
}

const fn default_network() -> NetworkType {
    NetworkType::Testnode
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("out")
}

const fn default_poll_interval() -> u64 {
    5
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.rpc_url.is_empty() {
            eyre::bail!("rpc_url must be set");
        }

        if self.poll_interval_secs == 0 {
            eyre::bail!("poll_interval_secs must be positive");
        }

        if self.stack.max_data_size == 0 {
            eyre::bail!("stack.max_data_size must be positive");
        }

        Ok(())
    }

    /// Network preset with the configured overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let builder = match self.network {
            NetworkType::Testnode => NetworkConfigBuilder::testnode(),
            NetworkType::Anvil => NetworkConfigBuilder::anvil(),
        };

        match self.l2_chain_id {
            Some(chain_id) => builder.l2_chain_id(chain_id).build(),
            None => builder.build(),
        }
    }
}
