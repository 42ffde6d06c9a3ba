use crate::setup::load_test_config;
use config::NetworkType;

#[path = "setup.rs"]
mod setup;

#[test]
fn test_load_test_config() {
    let config = load_test_config();

    assert_eq!(config.network, NetworkType::Anvil);
    assert_eq!(config.scan_chunk_size, 1000);
    assert_eq!(config.poll_interval_secs, 1);
    assert_eq!(config.stack.max_data_size, 117_964);
    assert!(config.mocks.bridge.is_none());
}

#[test]
fn test_network_config_from_test_config() {
    let config = load_test_config();
    let network = config.network_config();

    assert_eq!(network.l1.chain_id, 31337);
}
