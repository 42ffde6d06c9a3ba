//! Configuration types for the mock tooling.
//!
//! This crate provides:
//! - Network configurations (nitro testnode, anvil)
//! - Addresses of deployed mock contracts

pub mod mocks;
pub mod network;

pub use mocks::{ConfigError, MockAddresses};
pub use network::{ChainConfig, NetworkConfig, NetworkConfigBuilder, NetworkType};
