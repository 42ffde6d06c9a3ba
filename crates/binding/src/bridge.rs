//! Bridge and inbox mock bindings.
//!
//! Includes the test doubles for the L1 messaging layer:
//! - BridgeStub (in-memory accumulators, no outbox support)
//! - BridgeUnproxied (the real bridge deployed without a proxy)
//! - InboxStub (delayed inbox that only accepts L2 messages)
//! - SequencerInboxStub (sequencer inbox with a public init-message hook)

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// Time and block window a sequencer batch was posted in.
    struct TimeBounds {
        uint64 minTimestamp;
        uint64 maxTimestamp;
        uint64 minBlockNumber;
        uint64 maxBlockNumber;
    }

    /// Where the data of a sequencer batch can be found.
    enum BatchDataLocation {
        TxInput,
        SeparateBatchEvent,
        NoData,
        Blob
    }

    /// Bounds on how far a batch may lag or lead the L1 clock.
    struct MaxTimeVariation {
        uint256 delayBlocks;
        uint256 futureBlocks;
        uint256 delaySeconds;
        uint256 futureSeconds;
    }

    /// BridgeStub - bridge double that keeps both accumulators but never executes calls
    #[sol(rpc, abi, all_derives)]
    interface BridgeStub {
        /// Emitted for every message appended to the delayed inbox
        event MessageDelivered(
            uint256 indexed messageIndex,
            bytes32 indexed beforeInboxAcc,
            address inbox,
            uint8 kind,
            address sender,
            bytes32 messageDataHash,
            uint256 baseFeeL1,
            uint64 timestamp
        );

        event BridgeCallTriggered(
            address indexed outbox,
            address indexed to,
            uint256 value,
            bytes data
        );

        event InboxToggle(address indexed inbox, bool enabled);

        event OutboxToggle(address indexed outbox, bool enabled);

        event SequencerInboxUpdated(address newSequencerInbox);

        event RollupUpdated(address rollup);

        function activeOutbox() external view returns (address);
        function allowedDelayedInboxes(address inbox) external view returns (bool);
        function allowedOutboxes(address outbox) external view returns (bool);
        function allowedDelayedInboxList(uint256 index) external view returns (address);
        function allowedOutboxList(uint256 index) external view returns (address);
        function delayedInboxAccs(uint256 index) external view returns (bytes32);
        function sequencerInboxAccs(uint256 index) external view returns (bytes32);
        function delayedMessageCount() external view returns (uint256);
        function sequencerMessageCount() external view returns (uint256);
        function sequencerReportedSubMessageCount() external view returns (uint256);
        function sequencerInbox() external view returns (address);
        function rollup() external view returns (address);

        /// Append a message to the delayed inbox, returns its index
        function enqueueDelayedMessage(
            uint8 kind,
            address sender,
            bytes32 messageDataHash
        ) external payable returns (uint256);

        /// Append a batch to the sequencer inbox (sequencer inbox only)
        function enqueueSequencerMessage(
            bytes32 dataHash,
            uint256 afterDelayedMessagesRead,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external returns (uint256 seqMessageIndex, bytes32 beforeAcc, bytes32 delayedAcc, bytes32 acc);

        function submitBatchSpendingReport(address batchPoster, bytes32 dataHash)
            external returns (uint256 msgNum);

        /// Always reverts on the stub
        function executeCall(address to, uint256 value, bytes calldata data)
            external returns (bool success, bytes memory returnData);

        function setSequencerInbox(address _sequencerInbox) external;
        function setDelayedInbox(address inbox, bool enabled) external;
        function setOutbox(address outbox, bool enabled) external;
        function updateRollupAddress(address _rollup) external;
        function acceptFundsFromOldBridge() external payable;
        function initialize(address rollup_) external;
    }

    /// BridgeUnproxied - production bridge logic with the rollup set to the deployer
    #[sol(rpc, abi, all_derives)]
    interface BridgeUnproxied {
        constructor() {}

        event MessageDelivered(
            uint256 indexed messageIndex,
            bytes32 indexed beforeInboxAcc,
            address inbox,
            uint8 kind,
            address sender,
            bytes32 messageDataHash,
            uint256 baseFeeL1,
            uint64 timestamp
        );

        event BridgeCallTriggered(
            address indexed outbox,
            address indexed to,
            uint256 value,
            bytes data
        );

        event InboxToggle(address indexed inbox, bool enabled);

        event OutboxToggle(address indexed outbox, bool enabled);

        event SequencerInboxUpdated(address newSequencerInbox);

        event RollupUpdated(address rollup);

        function activeOutbox() external view returns (address);
        function allowedDelayedInboxes(address inbox) external view returns (bool);
        function allowedOutboxes(address outbox) external view returns (bool);
        function allowedDelayedInboxList(uint256 index) external view returns (address);
        function allowedOutboxList(uint256 index) external view returns (address);
        function delayedInboxAccs(uint256 index) external view returns (bytes32);
        function sequencerInboxAccs(uint256 index) external view returns (bytes32);
        function delayedMessageCount() external view returns (uint256);
        function sequencerMessageCount() external view returns (uint256);
        function sequencerReportedSubMessageCount() external view returns (uint256);
        function sequencerInbox() external view returns (address);
        function rollup() external view returns (address);

        function enqueueDelayedMessage(
            uint8 kind,
            address sender,
            bytes32 messageDataHash
        ) external payable returns (uint256);

        function enqueueSequencerMessage(
            bytes32 dataHash,
            uint256 afterDelayedMessagesRead,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external returns (uint256 seqMessageIndex, bytes32 beforeAcc, bytes32 delayedAcc, bytes32 acc);

        function submitBatchSpendingReport(address batchPoster, bytes32 dataHash)
            external returns (uint256 msgNum);

        /// Execute a call from an allowed outbox
        function executeCall(address to, uint256 value, bytes calldata data)
            external returns (bool success, bytes memory returnData);

        function setSequencerInbox(address _sequencerInbox) external;
        function setDelayedInbox(address inbox, bool enabled) external;
        function setOutbox(address outbox, bool enabled) external;
        function updateRollupAddress(address _rollup) external;
        function acceptFundsFromOldBridge() external payable;
        function initialize(address rollup_) external;
    }

    /// InboxStub - delayed inbox double, only L2 messages are supported
    #[sol(rpc, abi, all_derives)]
    interface InboxStub {
        /// Emitted with the full message body when a message is enqueued
        event InboxMessageDelivered(uint256 indexed messageNum, bytes data);

        /// Emitted when the message body must be read from the origin transaction
        event InboxMessageDeliveredFromOrigin(uint256 indexed messageNum);

        function bridge() external view returns (address);
        function sequencerInbox() external view returns (address);
        function paused() external view returns (bool);
        function allowListEnabled() external view returns (bool);
        function isAllowed(address user) external view returns (bool);
        function getProxyAdmin() external view returns (address);
        function maxDataSize() external view returns (uint256);

        /// Wire the inbox to its bridge and sequencer inbox
        function initialize(address _bridge, address _sequencerInbox) external;

        function postUpgradeInit(address _bridge) external;

        /// Send an L2 message, data is read back from the tx input
        function sendL2MessageFromOrigin(bytes calldata messageData) external returns (uint256);

        /// Send an L2 message, data is emitted in `InboxMessageDelivered`
        function sendL2Message(bytes calldata messageData) external returns (uint256);

        function sendUnsignedTransaction(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            uint256 nonce,
            address to,
            uint256 value,
            bytes calldata data
        ) external returns (uint256);

        function sendContractTransaction(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            address to,
            uint256 value,
            bytes calldata data
        ) external returns (uint256);

        function sendL1FundedUnsignedTransaction(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            uint256 nonce,
            address to,
            bytes calldata data
        ) external payable returns (uint256);

        function sendL1FundedContractTransaction(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            address to,
            bytes calldata data
        ) external payable returns (uint256);

        function sendL1FundedUnsignedTransactionToFork(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            uint256 nonce,
            address to,
            bytes calldata data
        ) external payable returns (uint256);

        function sendUnsignedTransactionToFork(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            uint256 nonce,
            address to,
            uint256 value,
            bytes calldata data
        ) external returns (uint256);

        function sendWithdrawEthToFork(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            uint256 nonce,
            uint256 value,
            address withdrawTo
        ) external returns (uint256);

        function createRetryableTicket(
            address to,
            uint256 l2CallValue,
            uint256 maxSubmissionCost,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            uint256 gasLimit,
            uint256 maxFeePerGas,
            bytes calldata data
        ) external payable returns (uint256);

        function unsafeCreateRetryableTicket(
            address to,
            uint256 l2CallValue,
            uint256 maxSubmissionCost,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            uint256 gasLimit,
            uint256 maxFeePerGas,
            bytes calldata data
        ) external payable returns (uint256);

        function depositEth() external payable returns (uint256);

        function calculateRetryableSubmissionFee(uint256 dataLength, uint256 baseFee)
            external view returns (uint256);

        function pause() external;
        function unpause() external;
        function setAllowList(address[] memory user, bool[] memory val) external;
        function setAllowListEnabled(bool _allowListEnabled) external;
    }

    /// SequencerInboxStub - sequencer inbox with the bridge, sequencer and limits set at construction
    #[sol(rpc, abi, all_derives)]
    interface SequencerInboxStub {
        constructor(
            address bridge_,
            address sequencer_,
            MaxTimeVariation memory maxTimeVariation_,
            uint256 maxDataSize_,
            address reader4844_,
            bool isUsingFeeToken_
        ) {}

        /// Emitted for every batch appended to the sequencer inbox
        event SequencerBatchDelivered(
            uint256 indexed batchSequenceNumber,
            bytes32 indexed beforeAcc,
            bytes32 indexed afterAcc,
            bytes32 delayedAcc,
            uint256 afterDelayedMessagesRead,
            TimeBounds timeBounds,
            BatchDataLocation dataLocation
        );

        /// Batch data posted in a separate event
        event SequencerBatchData(uint256 indexed batchSequenceNumber, bytes data);

        event SetValidKeyset(bytes32 indexed keysetHash, bytes keysetBytes);

        event InvalidateKeyset(bytes32 indexed keysetHash);

        event OwnerFunctionCalled(uint256 indexed id);

        event InboxMessageDelivered(uint256 indexed messageNum, bytes data);

        event InboxMessageDeliveredFromOrigin(uint256 indexed messageNum);

        /// Enqueue the chain initialization message in the delayed inbox
        function addInitMessage(uint256 chainId) external;

        /// Time bounds a batch posted in the current block would get
        function getTimeBounds() external view returns (TimeBounds memory);

        function addSequencerL2BatchFromOrigin(
            uint256 sequenceNumber,
            bytes calldata data,
            uint256 afterDelayedMessagesRead,
            address gasRefunder,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external;

        function addSequencerL2Batch(
            uint256 sequenceNumber,
            bytes calldata data,
            uint256 afterDelayedMessagesRead,
            address gasRefunder,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external;

        function addSequencerL2BatchFromBlobs(
            uint256 sequenceNumber,
            uint256 afterDelayedMessagesRead,
            address gasRefunder,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external;

        /// Force a delayed message into the sequencer inbox once the delay has passed
        function forceInclusion(
            uint256 _totalDelayedMessagesRead,
            uint8 kind,
            uint64[2] calldata l1BlockAndTime,
            uint256 baseFeeL1,
            address sender,
            bytes32 messageDataHash
        ) external;

        function batchCount() external view returns (uint256);
        function inboxAccs(uint256 index) external view returns (bytes32);
        function totalDelayedMessagesRead() external view returns (uint256);
        function bridge() external view returns (address);
        function rollup() external view returns (address);
        function reader4844() external view returns (address);
        function isUsingFeeToken() external view returns (bool);
        function maxDataSize() external view returns (uint256);

        function maxTimeVariation() external view returns (
            uint256 delayBlocks,
            uint256 futureBlocks,
            uint256 delaySeconds,
            uint256 futureSeconds
        );

        function setMaxTimeVariation(MaxTimeVariation memory maxTimeVariation_) external;

        function isBatchPoster(address poster) external view returns (bool);
        function setIsBatchPoster(address addr, bool isBatchPoster_) external;
        function isSequencer(address sequencer) external view returns (bool);
        function setIsSequencer(address addr, bool isSequencer_) external;

        function setValidKeyset(bytes calldata keysetBytes) external;
        function invalidateKeysetHash(bytes32 ksHash) external;
        function isValidKeysetHash(bytes32 ksHash) external view returns (bool);
        function getKeysetCreationBlock(bytes32 ksHash) external view returns (uint256);
        function dasKeySetInfo(bytes32 ksHash) external view returns (bool isValidKeyset, uint64 creationBlock);

        function updateRollupAddress() external;
        function removeDelayAfterFork() external;

        function HEADER_LENGTH() external view returns (uint256);
        function DATA_AUTHENTICATED_FLAG() external view returns (bytes1);
        function DAS_MESSAGE_HEADER_FLAG() external view returns (bytes1);
        function TREE_DAS_MESSAGE_HEADER_FLAG() external view returns (bytes1);
        function BROTLI_MESSAGE_HEADER_FLAG() external view returns (bytes1);
        function ZERO_HEAVY_MESSAGE_HEADER_FLAG() external view returns (bytes1);
        function DATA_BLOB_HEADER_FLAG() external view returns (bytes1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{keccak256, U256};
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn test_message_delivered_topic() {
        assert_eq!(
            BridgeStub::MessageDelivered::SIGNATURE,
            "MessageDelivered(uint256,bytes32,address,uint8,address,bytes32,uint256,uint64)"
        );
        assert_eq!(
            BridgeStub::MessageDelivered::SIGNATURE_HASH,
            keccak256(BridgeStub::MessageDelivered::SIGNATURE)
        );
        // Both bridges emit the same event.
        assert_eq!(
            BridgeStub::MessageDelivered::SIGNATURE_HASH,
            BridgeUnproxied::MessageDelivered::SIGNATURE_HASH
        );
    }

    #[test]
    fn test_sequencer_batch_delivered_expands_structs() {
        assert_eq!(
            SequencerInboxStub::SequencerBatchDelivered::SIGNATURE,
            "SequencerBatchDelivered(uint256,bytes32,bytes32,bytes32,uint256,(uint64,uint64,uint64,uint64),uint8)"
        );
    }

    #[test]
    fn test_batch_posting_selectors() {
        assert_eq!(
            SequencerInboxStub::addSequencerL2BatchFromOriginCall::SIGNATURE,
            "addSequencerL2BatchFromOrigin(uint256,bytes,uint256,address,uint256,uint256)"
        );
        assert_eq!(
            SequencerInboxStub::forceInclusionCall::SIGNATURE,
            "forceInclusion(uint256,uint8,uint64[2],uint256,address,bytes32)"
        );
        let expected = keccak256(SequencerInboxStub::addInitMessageCall::SIGNATURE);
        assert_eq!(
            SequencerInboxStub::addInitMessageCall::SELECTOR,
            expected[..4]
        );
    }

    #[test]
    fn test_inbox_message_events_shared() {
        assert_eq!(
            InboxStub::InboxMessageDelivered::SIGNATURE_HASH,
            SequencerInboxStub::InboxMessageDelivered::SIGNATURE_HASH
        );
        assert_eq!(
            InboxStub::InboxMessageDeliveredFromOrigin::SIGNATURE,
            "InboxMessageDeliveredFromOrigin(uint256)"
        );
    }

    #[test]
    fn test_retryable_ticket_signature() {
        assert_eq!(
            InboxStub::createRetryableTicketCall::SIGNATURE,
            "createRetryableTicket(address,uint256,uint256,address,address,uint256,uint256,bytes)"
        );
    }

    #[test]
    fn test_shared_types_carry_derives() {
        let bounds = TimeBounds {
            minTimestamp: 1,
            maxTimestamp: 2,
            minBlockNumber: 3,
            maxBlockNumber: 4,
        };
        assert_eq!(bounds.clone(), bounds);
        assert_ne!(bounds, TimeBounds::default());
        assert!(format!("{bounds:?}").contains("maxBlockNumber: 4"));

        let event = SequencerInboxStub::SequencerBatchDelivered {
            batchSequenceNumber: U256::from(1),
            beforeAcc: Default::default(),
            afterAcc: Default::default(),
            delayedAcc: Default::default(),
            afterDelayedMessagesRead: U256::ZERO,
            timeBounds: bounds,
            dataLocation: BatchDataLocation::TxInput,
        };
        assert_eq!(event.clone(), event);
    }
}
