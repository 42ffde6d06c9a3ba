//! Typed parsing of logs emitted by the mock contracts.

use crate::{bridge, challenge, proxy, simple};
use alloy_primitives::Log;
use alloy_sol_types::SolEvent;

macro_rules! mock_events {
    ($($variant:ident => $event:ty),* $(,)?) => {
        /// Any event emitted by a catalogue contract.
        ///
        /// Events with identical signatures on several mocks (e.g. both bridges,
        /// both challenge managers) share one variant.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum MockEvent {
            $($variant($event),)*
        }

        impl MockEvent {
            /// Decode a log by its first topic.
            ///
            /// Returns `Ok(None)` for anonymous logs and events of other contracts,
            /// and an error when the topic is known but the payload does not decode.
            pub fn parse(log: &Log) -> Result<Option<Self>, alloy_sol_types::Error> {
                let Some(topic0) = log.topics().first() else {
                    return Ok(None);
                };

                $(
                    if *topic0 == <$event as SolEvent>::SIGNATURE_HASH {
                        let event = <$event as SolEvent>::decode_log_data(&log.data)?;
                        return Ok(Some(Self::$variant(event)));
                    }
                )*

                Ok(None)
            }

            /// Event name as declared in Solidity.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant),)*
                }
            }
        }
    };
}

mock_events! {
    MessageDelivered => bridge::BridgeStub::MessageDelivered,
    BridgeCallTriggered => bridge::BridgeStub::BridgeCallTriggered,
    InboxToggle => bridge::BridgeStub::InboxToggle,
    OutboxToggle => bridge::BridgeStub::OutboxToggle,
    SequencerInboxUpdated => bridge::BridgeStub::SequencerInboxUpdated,
    RollupUpdated => bridge::BridgeStub::RollupUpdated,
    InboxMessageDelivered => bridge::InboxStub::InboxMessageDelivered,
    InboxMessageDeliveredFromOrigin => bridge::InboxStub::InboxMessageDeliveredFromOrigin,
    SequencerBatchDelivered => bridge::SequencerInboxStub::SequencerBatchDelivered,
    SequencerBatchData => bridge::SequencerInboxStub::SequencerBatchData,
    SetValidKeyset => bridge::SequencerInboxStub::SetValidKeyset,
    InvalidateKeyset => bridge::SequencerInboxStub::InvalidateKeyset,
    OwnerFunctionCalled => bridge::SequencerInboxStub::OwnerFunctionCalled,
    InitiatedChallenge => challenge::SingleExecutionChallenge::InitiatedChallenge,
    Bisected => challenge::SingleExecutionChallenge::Bisected,
    ExecutionChallengeBegun => challenge::SingleExecutionChallenge::ExecutionChallengeBegun,
    OneStepProofCompleted => challenge::SingleExecutionChallenge::OneStepProofCompleted,
    ChallengeEnded => challenge::SingleExecutionChallenge::ChallengeEnded,
    ChallengeCompleted => challenge::MockResultReceiver::ChallengeCompleted,
    OwnershipTransferred => proxy::ProxyAdminForBinding::OwnershipTransferred,
    UpgradeExecuted => proxy::UpgradeExecutorMock::UpgradeExecuted,
    TargetCallExecuted => proxy::UpgradeExecutorMock::TargetCallExecuted,
    RoleAdminChanged => proxy::UpgradeExecutorMock::RoleAdminChanged,
    RoleGranted => proxy::UpgradeExecutorMock::RoleGranted,
    RoleRevoked => proxy::UpgradeExecutorMock::RoleRevoked,
    Initialized => proxy::UpgradeExecutorMock::Initialized,
    CounterEvent => simple::Simple::CounterEvent,
    RedeemedEvent => simple::Simple::RedeemedEvent,
    NullEvent => simple::Simple::NullEvent,
    LogAndIncrementCalled => simple::Simple::LogAndIncrementCalled,
}

impl MockEvent {
    /// Parse every recognised log, skipping foreign and malformed ones.
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Vec<Self> {
        logs.into_iter()
            .filter_map(|log| Self::parse(log).ok().flatten())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, LogData, B256, U256};

    fn log_of<E: SolEvent>(event: &E) -> Log {
        Log {
            address: Address::repeat_byte(0x42),
            data: event.encode_log_data(),
        }
    }

    #[test]
    fn test_parse_message_delivered() {
        let event = bridge::BridgeStub::MessageDelivered {
            messageIndex: U256::from(3),
            beforeInboxAcc: B256::repeat_byte(0xab),
            inbox: Address::repeat_byte(1),
            kind: 3,
            sender: Address::repeat_byte(2),
            messageDataHash: B256::repeat_byte(0xcd),
            baseFeeL1: U256::from(1_000_000_000u64),
            timestamp: 1_700_000_000,
        };

        let parsed = MockEvent::parse(&log_of(&event)).unwrap();
        assert_eq!(parsed, Some(MockEvent::MessageDelivered(event)));
        assert_eq!(parsed.unwrap().name(), "MessageDelivered");
    }

    #[test]
    fn test_shared_signature_parses_once() {
        // SequencerInboxStub emits the same event as InboxStub.
        let event = bridge::SequencerInboxStub::InboxMessageDelivered {
            messageNum: U256::from(0),
            data: Bytes::from(U256::from(412346).to_be_bytes::<32>().to_vec()),
        };

        let parsed = MockEvent::parse(&log_of(&event)).unwrap().unwrap();
        let MockEvent::InboxMessageDelivered(delivered) = parsed else {
            panic!("unexpected variant {}", parsed.name());
        };
        assert_eq!(delivered.messageNum, U256::ZERO);
        assert_eq!(delivered.data.len(), 32);
    }

    #[test]
    fn test_unknown_topic_is_skipped() {
        let log = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![B256::repeat_byte(0xff)], Bytes::new()),
        };
        assert_eq!(MockEvent::parse(&log).unwrap(), None);

        let anonymous = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![], Bytes::new()),
        };
        assert_eq!(MockEvent::parse(&anonymous).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        // CounterEvent topic with no data word.
        let log = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(
                vec![simple::Simple::CounterEvent::SIGNATURE_HASH],
                Bytes::new(),
            ),
        };
        assert!(MockEvent::parse(&log).is_err());
    }

    #[test]
    fn test_from_logs_filters() {
        let counter = simple::Simple::CounterEvent { count: 9 };
        let foreign = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x01)], Bytes::new()),
        };
        let logs = vec![log_of(&counter), foreign, log_of(&simple::Simple::NullEvent {})];

        let events = MockEvent::from_logs(&logs);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], MockEvent::CounterEvent(counter));
        assert_eq!(events[1].name(), "NullEvent");
    }
}
