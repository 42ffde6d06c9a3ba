use crate::global_state::GlobalStateView;
use alloy_contract::private::Provider;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::{BlockNumberOrTag, Log};
use binding::challenge::{
    ChallengeMode, ChallengeTerminationType, MockResultReceiver, SingleExecutionChallenge,
};
use client::scan::{chunks, resolve_block_range, scan_with_retry, DEFAULT_CHUNK_SIZE};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Where a challenge stands according to its manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// No challenge at this index, or it was already resolved and deleted
    NoChallenge,
    Active {
        responder: Address,
        time_left: U256,
        mode: ChallengeMode,
    },
    /// The current responder ran out of time
    TimedOut { responder: Address },
}

/// A lifecycle event of a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeEvent {
    Initiated {
        index: u64,
        start: GlobalStateView,
        end: GlobalStateView,
        block: u64,
    },
    ExecutionBegun {
        index: u64,
        block_steps: U256,
        block: u64,
    },
    Ended {
        index: u64,
        kind: ChallengeTerminationType,
        block: u64,
    },
}

impl ChallengeEvent {
    pub const fn index(&self) -> u64 {
        match self {
            Self::Initiated { index, .. }
            | Self::ExecutionBegun { index, .. }
            | Self::Ended { index, .. } => *index,
        }
    }

    pub const fn block(&self) -> u64 {
        match self {
            Self::Initiated { block, .. }
            | Self::ExecutionBegun { block, .. }
            | Self::Ended { block, .. } => *block,
        }
    }
}

/// A `ChallengeCompleted` record of a result receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub challenge_index: U256,
    pub winner: Address,
    pub loser: Address,
    pub block: u64,
    pub tx_hash: Option<B256>,
}

/// Reads challenge state from a challenge manager mock.
pub struct ChallengeStateProvider<P> {
    provider: P,
    manager: Address,
    chunk_size: u64,
}

impl<P> ChallengeStateProvider<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, manager: Address) -> Self {
        Self {
            provider,
            manager,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the scan chunk size, zero keeps the default.
    pub const fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        if chunk_size > 0 {
            self.chunk_size = chunk_size;
        }
        self
    }

    pub async fn total_challenges(&self) -> eyre::Result<u64> {
        let manager = SingleExecutionChallenge::new(self.manager, &self.provider);
        Ok(manager.totalChallengesCreated().call().await?)
    }

    pub async fn status(&self, index: u64) -> eyre::Result<ChallengeStatus> {
        let manager = SingleExecutionChallenge::new(self.manager, &self.provider);

        let challenge = manager.challengeInfo(index).call().await?;
        if challenge.mode == ChallengeMode::NONE {
            return Ok(ChallengeStatus::NoChallenge);
        }

        let responder = manager.currentResponder(index).call().await?;
        if manager.isTimedOut(index).call().await? {
            return Ok(ChallengeStatus::TimedOut { responder });
        }

        Ok(ChallengeStatus::Active {
            responder,
            time_left: challenge.current.timeLeft,
            mode: challenge.mode,
        })
    }

    /// Lifecycle events of all challenges in the given block range, in block order.
    pub async fn challenge_events(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<ChallengeEvent>> {
        let (from, to) = resolve_block_range(&self.provider, from_block, to_block).await?;

        debug!(from, to, manager = %self.manager, "Scanning for challenge events");

        let mut events = Vec::new();
        for (start, end) in chunks(from, to, self.chunk_size) {
            let chunk = scan_with_retry(start, end, || self.scan_events(start, end)).await?;
            events.extend(chunk);
        }

        Ok(events)
    }

    /// `ChallengeCompleted` records of `receiver` in the given block range.
    pub async fn completions(
        &self,
        receiver: Address,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<Completion>> {
        let (from, to) = resolve_block_range(&self.provider, from_block, to_block).await?;

        debug!(from, to, receiver = %receiver, "Scanning for challenge completions");

        let mut completions = Vec::new();
        for (start, end) in chunks(from, to, self.chunk_size) {
            let chunk =
                scan_with_retry(start, end, || self.scan_completions(receiver, start, end)).await?;
            completions.extend(chunk);
        }

        Ok(completions)
    }

    async fn scan_events(&self, from: u64, to: u64) -> eyre::Result<Vec<ChallengeEvent>> {
        let manager = SingleExecutionChallenge::new(self.manager, &self.provider);

        let initiated = manager
            .InitiatedChallenge_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await?;
        let begun = manager
            .ExecutionChallengeBegun_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await?;
        let ended = manager
            .ChallengeEnded_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await?;

        // (block, log index) keeps events of one transaction in emission order
        let mut events = Vec::with_capacity(initiated.len() + begun.len() + ended.len());
        for (event, log) in initiated {
            let Some(position) = log_position(&log) else {
                warn!(
                    index = event.challengeIndex,
                    "Skipping pending InitiatedChallenge log"
                );
                continue;
            };
            let block = position.0;
            events.push((
                position,
                ChallengeEvent::Initiated {
                    index: event.challengeIndex,
                    start: event.startState.into(),
                    end: event.endState.into(),
                    block,
                },
            ));
        }
        for (event, log) in begun {
            let Some(position) = log_position(&log) else {
                warn!(
                    index = event.challengeIndex,
                    "Skipping pending ExecutionChallengeBegun log"
                );
                continue;
            };
            let block = position.0;
            events.push((
                position,
                ChallengeEvent::ExecutionBegun {
                    index: event.challengeIndex,
                    block_steps: event.blockSteps,
                    block,
                },
            ));
        }
        for (event, log) in ended {
            let Some(position) = log_position(&log) else {
                warn!(
                    index = event.challengeIndex,
                    "Skipping pending ChallengeEnded log"
                );
                continue;
            };
            let block = position.0;
            events.push((
                position,
                ChallengeEvent::Ended {
                    index: event.challengeIndex,
                    kind: event.kind,
                    block,
                },
            ));
        }

        events.sort_by_key(|(position, _)| *position);
        Ok(events.into_iter().map(|(_, event)| event).collect())
    }

    async fn scan_completions(
        &self,
        receiver: Address,
        from: u64,
        to: u64,
    ) -> eyre::Result<Vec<Completion>> {
        let receiver = MockResultReceiver::new(receiver, &self.provider);
        let events = receiver
            .ChallengeCompleted_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await?;

        Ok(events
            .into_iter()
            .filter_map(|(event, log)| {
                let Some(block) = log.block_number else {
                    warn!(
                        index = %event.challengeIndex,
                        "Skipping pending ChallengeCompleted log"
                    );
                    return None;
                };
                Some(Completion {
                    challenge_index: event.challengeIndex,
                    winner: event.winner,
                    loser: event.loser,
                    block,
                    tx_hash: log.transaction_hash,
                })
            })
            .collect())
    }
}

/// `(block, log index)` of a mined log, `None` while it is pending.
fn log_position(log: &Log) -> Option<(u64, u64)> {
    Some((log.block_number?, log.log_index.unwrap_or_default()))
}

/// Latest event of each challenge, keyed by index.
pub fn latest_by_challenge(events: &[ChallengeEvent]) -> Vec<(u64, &ChallengeEvent)> {
    let mut latest = BTreeMap::new();
    for event in events {
        latest.insert(event.index(), event);
    }
    latest.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_provider::{network::Ethereum, RootProvider};

    /// Provider for calls that return before reaching the node.
    #[derive(Clone)]
    struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }

    fn initiated(index: u64, block: u64) -> ChallengeEvent {
        ChallengeEvent::Initiated {
            index,
            start: GlobalStateView::default(),
            end: GlobalStateView::new(B256::repeat_byte(1), B256::ZERO, 1, 0),
            block,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = ChallengeEvent::Ended {
            index: 4,
            kind: ChallengeTerminationType::TIMEOUT,
            block: 99,
        };
        assert_eq!(event.index(), 4);
        assert_eq!(event.block(), 99);
    }

    #[test]
    fn test_latest_by_challenge() {
        let ended = ChallengeEvent::Ended {
            index: 0,
            kind: ChallengeTerminationType::EXECUTION_PROOF,
            block: 12,
        };
        let events = vec![initiated(1, 10), initiated(0, 9), ended.clone()];

        let latest = latest_by_challenge(&events);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0], (0, &ended));
        assert_eq!(latest[1], (1, &events[0]));
    }

    #[test]
    fn test_latest_by_challenge_empty() {
        assert!(latest_by_challenge(&[]).is_empty());
    }

    #[test]
    fn test_latest_by_challenge_keeps_last_event() {
        let begun = ChallengeEvent::ExecutionBegun {
            index: 2,
            block_steps: U256::from(8),
            block: 20,
        };
        let events = vec![initiated(2, 10), begun.clone(), initiated(2, 30)];

        let latest = latest_by_challenge(&events);
        assert_eq!(latest, vec![(2, &events[2])]);
        assert_ne!(latest[0].1, &begun);
    }

    #[test]
    fn test_log_position() {
        assert_eq!(log_position(&Log::default()), None);

        let mined = Log {
            block_number: Some(12),
            log_index: Some(3),
            ..Default::default()
        };
        assert_eq!(log_position(&mined), Some((12, 3)));
    }

    #[tokio::test]
    async fn test_scans_reject_reversed_range() {
        let state = ChallengeStateProvider::new(MockProvider, Address::repeat_byte(0xc4));

        let events = state
            .challenge_events(BlockNumberOrTag::Number(10), BlockNumberOrTag::Number(5))
            .await;
        assert!(events.is_err());

        let completions = state
            .completions(
                Address::repeat_byte(0x7e),
                BlockNumberOrTag::Number(10),
                BlockNumberOrTag::Number(5),
            )
            .await;
        assert!(completions.is_err());
    }
}
