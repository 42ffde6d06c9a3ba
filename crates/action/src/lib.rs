pub mod batch;
pub mod challenge;
pub mod delayed;
pub mod deploy;
pub mod simple;

use alloy_primitives::{TxHash, U256};
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::SolEvent;
use std::future::Future;

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    ///
    /// Returns true if all preconditions are met.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Check if the action has already been completed.
    ///
    /// Returns true if the action was already executed successfully.
    fn is_completed(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Execute the action.
    ///
    /// Returns the transaction hash of the executed action.
    fn execute(&mut self) -> impl Future<Output = eyre::Result<Result>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Result of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Result {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<U256>,
}

impl Result {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
        }
    }
}

/// First log in `receipt` that decodes as `E`, whichever contract emitted it.
pub(crate) fn find_event<E: SolEvent>(receipt: &TransactionReceipt) -> eyre::Result<E> {
    receipt
        .logs()
        .iter()
        .find_map(|log| E::decode_log(&log.inner).ok().map(|decoded| decoded.data))
        .ok_or_else(|| eyre::eyre!("{} event not found in receipt", E::SIGNATURE))
}

/// Fail on a reverted receipt.
pub(crate) fn ensure_success(receipt: &TransactionReceipt) -> eyre::Result<()> {
    if !receipt.status() {
        eyre::bail!("Transaction {} reverted", receipt.transaction_hash);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use alloy_provider::{network::Ethereum, Provider, RootProvider};

    /// Mock provider for unit tests.
    #[derive(Clone)]
    pub struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }
}
