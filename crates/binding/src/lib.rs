//! Contract bindings for the rollup mock and stub contracts.
//!
//! This crate consolidates the Solidity test doubles used by the rollup system tests:
//! - Bridge and inbox stubs (BridgeStub, BridgeUnproxied, InboxStub, SequencerInboxStub)
//! - Challenge mocks (SingleExecutionChallenge, TimedOutChallengeManager, MockResultReceiver)
//! - Proxy and upgrade mocks (SimpleProxy, ProxyAdminForBinding, UpgradeExecutorMock)
//! - General test contracts (Simple, PendingBlkTimeAndNrAdvanceCheck, Benchmarks)
//!
//! All bindings are generated using alloy's `sol!` macro. Bytecode comes from
//! compiled artifacts, see [`artifact`].

pub mod artifact;
pub mod bridge;
pub mod challenge;
pub mod events;
pub mod proxy;
pub mod simple;

pub use artifact::{Artifact, ArtifactError};
pub use events::MockEvent;

use alloy_json_abi::JsonAbi;
use std::path::{Path, PathBuf};

/// Every contract with a binding in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockContract {
    BridgeStub,
    BridgeUnproxied,
    InboxStub,
    SequencerInboxStub,
    SingleExecutionChallenge,
    TimedOutChallengeManager,
    MockResultReceiver,
    SimpleProxy,
    ProxyAdminForBinding,
    UpgradeExecutorMock,
    Simple,
    PendingBlkTimeAndNrAdvanceCheck,
    Benchmarks,
}

impl MockContract {
    pub const fn all() -> &'static [Self] {
        &[
            Self::BridgeStub,
            Self::BridgeUnproxied,
            Self::InboxStub,
            Self::SequencerInboxStub,
            Self::SingleExecutionChallenge,
            Self::TimedOutChallengeManager,
            Self::MockResultReceiver,
            Self::SimpleProxy,
            Self::ProxyAdminForBinding,
            Self::UpgradeExecutorMock,
            Self::Simple,
            Self::PendingBlkTimeAndNrAdvanceCheck,
            Self::Benchmarks,
        ]
    }

    /// Solidity contract name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BridgeStub => "BridgeStub",
            Self::BridgeUnproxied => "BridgeUnproxied",
            Self::InboxStub => "InboxStub",
            Self::SequencerInboxStub => "SequencerInboxStub",
            Self::SingleExecutionChallenge => "SingleExecutionChallenge",
            Self::TimedOutChallengeManager => "TimedOutChallengeManager",
            Self::MockResultReceiver => "MockResultReceiver",
            Self::SimpleProxy => "SimpleProxy",
            Self::ProxyAdminForBinding => "ProxyAdminForBinding",
            Self::UpgradeExecutorMock => "UpgradeExecutorMock",
            Self::Simple => "Simple",
            Self::PendingBlkTimeAndNrAdvanceCheck => "PendingBlkTimeAndNrAdvanceCheck",
            Self::Benchmarks => "Benchmarks",
        }
    }

    /// Look up a contract by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|contract| contract.name().eq_ignore_ascii_case(name))
    }

    /// Path of the Foundry artifact, `<root>/<Name>.sol/<Name>.json`.
    pub fn artifact_path(&self, root: impl AsRef<Path>) -> PathBuf {
        let name = self.name();
        root.as_ref()
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"))
    }

    /// JSON ABI of the binding.
    pub fn abi(&self) -> JsonAbi {
        match self {
            Self::BridgeStub => bridge::BridgeStub::abi::contract(),
            Self::BridgeUnproxied => bridge::BridgeUnproxied::abi::contract(),
            Self::InboxStub => bridge::InboxStub::abi::contract(),
            Self::SequencerInboxStub => bridge::SequencerInboxStub::abi::contract(),
            Self::SingleExecutionChallenge => challenge::SingleExecutionChallenge::abi::contract(),
            Self::TimedOutChallengeManager => challenge::TimedOutChallengeManager::abi::contract(),
            Self::MockResultReceiver => challenge::MockResultReceiver::abi::contract(),
            Self::SimpleProxy => proxy::SimpleProxy::abi::contract(),
            Self::ProxyAdminForBinding => proxy::ProxyAdminForBinding::abi::contract(),
            Self::UpgradeExecutorMock => proxy::UpgradeExecutorMock::abi::contract(),
            Self::Simple => simple::Simple::abi::contract(),
            Self::PendingBlkTimeAndNrAdvanceCheck => {
                simple::PendingBlkTimeAndNrAdvanceCheck::abi::contract()
            }
            Self::Benchmarks => simple::Benchmarks::abi::contract(),
        }
    }
}

impl std::fmt::Display for MockContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(MockContract::from_name("bridgestub"), Some(MockContract::BridgeStub));
        assert_eq!(MockContract::from_name("SIMPLE"), Some(MockContract::Simple));
        assert_eq!(MockContract::from_name("Rollup"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for contract in MockContract::all() {
            assert_eq!(MockContract::from_name(contract.name()), Some(*contract));
        }
        assert_eq!(MockContract::all().len(), 13);
    }

    #[test]
    fn test_artifact_path_layout() {
        let path = MockContract::SequencerInboxStub.artifact_path("out");
        assert_eq!(
            path,
            PathBuf::from("out/SequencerInboxStub.sol/SequencerInboxStub.json")
        );
    }

    #[test]
    fn test_abi_contents() {
        let abi = MockContract::SequencerInboxStub.abi();
        assert!(abi.constructor.is_some());
        assert!(abi.functions.contains_key("addSequencerL2BatchFromOrigin"));
        assert!(abi.events.contains_key("SequencerBatchDelivered"));

        let abi = MockContract::InboxStub.abi();
        assert!(abi.constructor.is_none());
        assert!(abi.functions.contains_key("sendL2Message"));
    }
}
