//! Deploy mock contract action.
//!
//! Sends the creation bytecode of a compiled artifact, followed by the
//! ABI-encoded constructor arguments.

use crate::{ensure_success, Action};
use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::SolConstructor;
use binding::{
    bridge::{MaxTimeVariation, SequencerInboxStub},
    challenge::MockResultReceiver,
    Artifact, MockContract,
};
use tracing::info;

/// Input data for deploying a mock.
#[derive(Clone, Debug)]
pub struct Deploy {
    pub contract: MockContract,
    pub artifact: Artifact,
    /// ABI-encoded constructor arguments, empty for contracts without any
    pub constructor_args: Bytes,
    /// Address of an earlier deployment, if known
    pub address: Option<Address>,
}

/// A finished deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub contract: MockContract,
    pub address: Address,
    pub result: crate::Result,
}

pub struct DeployAction<P> {
    provider: P,
    action: Deploy,
}

impl<P> DeployAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: Deploy) -> Self {
        Self { provider, action }
    }

    /// Address of the deployed contract, once known.
    pub const fn address(&self) -> Option<Address> {
        self.action.address
    }

    /// Check the artifact before sending anything.
    /// Contract creation transaction carrying creation code and constructor args.
    fn creation_request(&self) -> TransactionRequest {
        let code = self.action.artifact.deploy_code(&self.action.constructor_args);
        TransactionRequest {
            to: Some(TxKind::Create),
            input: code.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.artifact.bytecode.is_empty() {
            eyre::bail!("Artifact for {} has no bytecode", self.action.contract);
        }

        self.action.artifact.verify_against(self.action.contract)?;

        Ok(())
    }

    /// Deploy and return the new contract address.
    pub async fn deploy(&mut self) -> eyre::Result<Deployment> {
        self.validate()?;

        let tx = self.creation_request();
        let receipt = self.provider.send_transaction(tx).await?.get_receipt().await?;
        ensure_success(&receipt)?;

        let Some(address) = receipt.contract_address else {
            eyre::bail!("Deployment receipt of {} has no contract address", self.action.contract);
        };

        info!(
            contract = %self.action.contract,
            address = %address,
            tx_hash = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "Mock deployed."
        );

        self.action.address = Some(address);

        Ok(Deployment {
            contract: self.action.contract,
            address,
            result: crate::Result::from_receipt(&receipt),
        })
    }
}

impl<P> Action for DeployAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.validate().is_ok())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(address) = self.action.address else {
            return Ok(false);
        };

        let code = self.provider.get_code_at(address).await?;
        Ok(!code.is_empty())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        if self.is_completed().await? {
            eyre::bail!("{} already deployed", self.action.contract)
        }

        Ok(self.deploy().await?.result)
    }

    fn description(&self) -> String {
        match self.action.address {
            Some(address) => format!("Deploy {} (previously at {})", self.action.contract, address),
            None => format!("Deploy {}", self.action.contract),
        }
    }
}

/// Constructor arguments of `SequencerInboxStub` without a blob reader or fee token.
pub fn sequencer_inbox_args(
    bridge: Address,
    sequencer: Address,
    max_time_variation: MaxTimeVariation,
    max_data_size: U256,
) -> Bytes {
    SequencerInboxStub::constructorCall {
        bridge_: bridge,
        sequencer_: sequencer,
        maxTimeVariation_: max_time_variation,
        maxDataSize_: max_data_size,
        reader4844_: Address::ZERO,
        isUsingFeeToken_: false,
    }
    .abi_encode()
    .into()
}

/// Constructor arguments of `MockResultReceiver`.
pub fn result_receiver_args(manager: Address) -> Bytes {
    MockResultReceiver::constructorCall { manager_: manager }
        .abi_encode()
        .into()
}
