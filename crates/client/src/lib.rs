pub mod scan;

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Node reports a different chain than the configured one
    #[error("Chain id mismatch: expected {expected}, node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
}

/// Convenience function to create an ethereum rpc provider from url.
pub async fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a provider with wallet signing capability from a private key.
pub fn create_wallet_provider(
    rpc_url: &str,
    private_key: &str,
) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let signer = parse_signer(private_key)?;
    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(provider)
}

/// Address controlled by a private key.
pub fn signer_address(private_key: &str) -> Result<Address, ClientError> {
    Ok(parse_signer(private_key)?.address())
}

/// Fail unless the node behind `provider` serves `expected` chain id.
///
/// Mock deployments are only meaningful on dev chains, this guards against
/// pointing the tooling at the wrong endpoint.
pub async fn ensure_chain_id<P>(provider: &P, expected: u64) -> Result<(), ClientError>
where
    P: Provider,
{
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    if actual != expected {
        return Err(ClientError::ChainIdMismatch { expected, actual });
    }

    Ok(())
}

fn parse_signer(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    // First default dev account of anvil and the nitro testnode.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = create_wallet_provider("http://127.0.0.1:8545", "0x1234");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_signer_address() {
        assert_eq!(
            signer_address(DEV_KEY).unwrap(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        // Keys are accepted without the 0x prefix too.
        assert_eq!(
            signer_address(DEV_KEY.trim_start_matches("0x")).unwrap(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_chain_id_mismatch_message() {
        let err = ClientError::ChainIdMismatch {
            expected: 1337,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Chain id mismatch: expected 1337, node reports 1"
        );
    }
}
