//! Addresses of already deployed mock contracts.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A command needs a mock that has not been configured
    #[error("Address of {0} is not configured")]
    MissingAddress(&'static str),
}

/// Known mock addresses, all optional.
///
/// Filled from the `[mocks]` table of the config file or by `deploy-stack`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockAddresses {
    pub bridge: Option<Address>,
    pub inbox: Option<Address>,
    pub sequencer_inbox: Option<Address>,
    pub simple: Option<Address>,
    pub challenge_manager: Option<Address>,
    pub result_receiver: Option<Address>,
    pub upgrade_executor: Option<Address>,
    pub proxy_admin: Option<Address>,
}

impl MockAddresses {
    pub fn bridge(&self) -> Result<Address, ConfigError> {
        require(self.bridge, "bridge")
    }

    pub fn inbox(&self) -> Result<Address, ConfigError> {
        require(self.inbox, "inbox")
    }

    pub fn sequencer_inbox(&self) -> Result<Address, ConfigError> {
        require(self.sequencer_inbox, "sequencer_inbox")
    }

    pub fn simple(&self) -> Result<Address, ConfigError> {
        require(self.simple, "simple")
    }

    pub fn challenge_manager(&self) -> Result<Address, ConfigError> {
        require(self.challenge_manager, "challenge_manager")
    }

    pub fn result_receiver(&self) -> Result<Address, ConfigError> {
        require(self.result_receiver, "result_receiver")
    }

    pub fn upgrade_executor(&self) -> Result<Address, ConfigError> {
        require(self.upgrade_executor, "upgrade_executor")
    }

    pub fn proxy_admin(&self) -> Result<Address, ConfigError> {
        require(self.proxy_admin, "proxy_admin")
    }

    /// Fill unset addresses from `other`, keeping the ones already set.
    pub fn merge(self, other: Self) -> Self {
        Self {
            bridge: self.bridge.or(other.bridge),
            inbox: self.inbox.or(other.inbox),
            sequencer_inbox: self.sequencer_inbox.or(other.sequencer_inbox),
            simple: self.simple.or(other.simple),
            challenge_manager: self.challenge_manager.or(other.challenge_manager),
            result_receiver: self.result_receiver.or(other.result_receiver),
            upgrade_executor: self.upgrade_executor.or(other.upgrade_executor),
            proxy_admin: self.proxy_admin.or(other.proxy_admin),
        }
    }
}

fn require(address: Option<Address>, name: &'static str) -> Result<Address, ConfigError> {
    match address {
        Some(address) if address != Address::ZERO => Ok(address),
        _ => Err(ConfigError::MissingAddress(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_parse_partial_table() {
        let addresses: MockAddresses = toml::from_str(
            r#"
            bridge = "0x1111111111111111111111111111111111111111"
            simple = "0x2222222222222222222222222222222222222222"
            "#,
        )
        .unwrap();

        assert_eq!(
            addresses.bridge().unwrap(),
            address!("1111111111111111111111111111111111111111")
        );
        assert_eq!(
            addresses.inbox(),
            Err(ConfigError::MissingAddress("inbox"))
        );
    }

    #[test]
    fn test_zero_address_is_missing() {
        let addresses = MockAddresses {
            sequencer_inbox: Some(Address::ZERO),
            ..Default::default()
        };
        assert!(addresses.sequencer_inbox().is_err());
    }

    #[test]
    fn test_merge_prefers_existing() {
        let configured = MockAddresses {
            bridge: Some(Address::repeat_byte(1)),
            ..Default::default()
        };
        let deployed = MockAddresses {
            bridge: Some(Address::repeat_byte(2)),
            inbox: Some(Address::repeat_byte(3)),
            ..Default::default()
        };

        let merged = configured.merge(deployed);
        assert_eq!(merged.bridge, Some(Address::repeat_byte(1)));
        assert_eq!(merged.inbox, Some(Address::repeat_byte(3)));
        assert_eq!(merged.simple, None);
    }
}
