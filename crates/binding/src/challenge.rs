//! Challenge protocol mock bindings.
//!
//! Includes:
//! - SingleExecutionChallenge (challenge manager that starts in execution mode)
//! - TimedOutChallengeManager (challenge manager whose challenges are always timed out)
//! - MockResultReceiver (records challenge outcomes reported by a manager)

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// Machine global state (block hash, send root, batch, position in batch)
    struct GlobalState {
        bytes32[2] bytes32Vals;
        uint64[2] u64Vals;
    }

    enum MachineStatus {
        RUNNING,
        FINISHED,
        ERRORED,
        TOO_FAR
    }

    enum ChallengeMode {
        NONE,
        BLOCK,
        EXECUTION
    }

    /// Why a challenge ended, as reported in `ChallengeEnded`
    enum ChallengeTerminationType {
        TIMEOUT,
        BLOCK_PROOF,
        EXECUTION_PROOF,
        CLEARED
    }

    /// A challenge participant and its remaining clock
    struct Participant {
        address addr;
        uint256 timeLeft;
    }

    /// Challenge record (`ChallengeLib.Challenge`)
    struct Challenge {
        Participant current;
        Participant next;
        uint256 lastMoveTimestamp;
        bytes32 wasmModuleRoot;
        bytes32 challengeStateHash;
        uint64 maxInboxMessages;
        ChallengeMode mode;
    }

    /// Segment being bisected (`ChallengeLib.SegmentSelection`)
    struct SegmentSelection {
        uint256 oldSegmentsStart;
        uint256 oldSegmentsLength;
        bytes32[] oldSegments;
        uint256 challengePosition;
    }

    /// SingleExecutionChallenge - creates one execution challenge in its constructor
    #[sol(rpc, abi, all_derives)]
    interface SingleExecutionChallenge {
        constructor(
            address osp_,
            address resultReceiver_,
            uint64 maxInboxMessagesRead_,
            bytes32[2] memory startAndEndHashes,
            uint256 numSteps_,
            address asserter_,
            address challenger_,
            uint256 asserterTimeLeft_,
            uint256 challengerTimeLeft_
        ) {}

        event InitiatedChallenge(
            uint64 indexed challengeIndex,
            GlobalState startState,
            GlobalState endState
        );

        event Bisected(
            uint64 indexed challengeIndex,
            bytes32 indexed challengeRoot,
            uint256 challengedSegmentStart,
            uint256 challengedSegmentLength,
            bytes32[] chainHashes
        );

        event ExecutionChallengeBegun(uint64 indexed challengeIndex, uint256 blockSteps);

        event OneStepProofCompleted(uint64 indexed challengeIndex);

        event ChallengeEnded(uint64 indexed challengeIndex, ChallengeTerminationType kind);

        function totalChallengesCreated() external view returns (uint64);
        function resultReceiver() external view returns (address);
        function sequencerInbox() external view returns (address);
        function bridge() external view returns (address);
        function osp() external view returns (address);

        function initialize(
            address resultReceiver_,
            address sequencerInbox_,
            address bridge_,
            address osp_
        ) external;

        function postUpgradeInit(address osp_) external;

        function createChallenge(
            bytes32 wasmModuleRoot_,
            MachineStatus[2] calldata startAndEndMachineStatuses_,
            GlobalState[2] calldata startAndEndGlobalStates_,
            uint64 numBlocks,
            address asserter_,
            address challenger_,
            uint256 asserterTimeLeft_,
            uint256 challengerTimeLeft_
        ) external returns (uint64);

        /// Full challenge record by index
        function challengeInfo(uint64 challengeIndex) external view returns (Challenge memory);

        /// Participant expected to make the next move
        function currentResponder(uint64 challengeIndex) external view returns (address);

        function isTimedOut(uint64 challengeIndex) external view returns (bool);

        function bisectExecution(
            uint64 challengeIndex,
            SegmentSelection calldata selection,
            bytes32[] calldata newSegments
        ) external;

        function challengeExecution(
            uint64 challengeIndex,
            SegmentSelection calldata selection,
            MachineStatus[2] calldata machineStatuses,
            bytes32[2] calldata globalStateHashes,
            uint256 numSteps
        ) external;

        function oneStepProveExecution(
            uint64 challengeIndex,
            SegmentSelection calldata selection,
            bytes calldata proof
        ) external;

        function timeout(uint64 challengeIndex) external;
        function clearChallenge(uint64 challengeIndex) external;
    }

    /// TimedOutChallengeManager - challenge manager with `isTimedOut` hardwired to true
    #[sol(rpc, abi, all_derives)]
    interface TimedOutChallengeManager {
        event InitiatedChallenge(
            uint64 indexed challengeIndex,
            GlobalState startState,
            GlobalState endState
        );

        event Bisected(
            uint64 indexed challengeIndex,
            bytes32 indexed challengeRoot,
            uint256 challengedSegmentStart,
            uint256 challengedSegmentLength,
            bytes32[] chainHashes
        );

        event ExecutionChallengeBegun(uint64 indexed challengeIndex, uint256 blockSteps);

        event OneStepProofCompleted(uint64 indexed challengeIndex);

        event ChallengeEnded(uint64 indexed challengeIndex, ChallengeTerminationType kind);

        function totalChallengesCreated() external view returns (uint64);
        function resultReceiver() external view returns (address);
        function sequencerInbox() external view returns (address);
        function bridge() external view returns (address);
        function osp() external view returns (address);

        function initialize(
            address resultReceiver_,
            address sequencerInbox_,
            address bridge_,
            address osp_
        ) external;

        function postUpgradeInit(address osp_) external;

        function createChallenge(
            bytes32 wasmModuleRoot_,
            MachineStatus[2] calldata startAndEndMachineStatuses_,
            GlobalState[2] calldata startAndEndGlobalStates_,
            uint64 numBlocks,
            address asserter_,
            address challenger_,
            uint256 asserterTimeLeft_,
            uint256 challengerTimeLeft_
        ) external returns (uint64);

        function challengeInfo(uint64 challengeIndex) external view returns (Challenge memory);
        function currentResponder(uint64 challengeIndex) external view returns (address);

        /// Always true on this mock
        function isTimedOut(uint64 challengeIndex) external view returns (bool);

        function bisectExecution(
            uint64 challengeIndex,
            SegmentSelection calldata selection,
            bytes32[] calldata newSegments
        ) external;

        function challengeExecution(
            uint64 challengeIndex,
            SegmentSelection calldata selection,
            MachineStatus[2] calldata machineStatuses,
            bytes32[2] calldata globalStateHashes,
            uint256 numSteps
        ) external;

        function oneStepProveExecution(
            uint64 challengeIndex,
            SegmentSelection calldata selection,
            bytes calldata proof
        ) external;

        function timeout(uint64 challengeIndex) external;
        function clearChallenge(uint64 challengeIndex) external;
    }

    /// MockResultReceiver - stands in for the rollup when a challenge completes
    #[sol(rpc, abi, all_derives)]
    interface MockResultReceiver {
        constructor(address manager_) {}

        /// Emitted when the manager reports the outcome of a challenge
        event ChallengeCompleted(
            uint256 indexed challengeIndex,
            address indexed winner,
            address indexed loser
        );

        function manager() external view returns (address);
        function winner() external view returns (address);
        function loser() external view returns (address);
        function challengeIndex() external view returns (uint256);

        /// Forward a new challenge to the manager
        function createChallenge(
            bytes32 wasmModuleRoot_,
            MachineStatus[2] calldata startAndEndMachineStatuses_,
            GlobalState[2] calldata startAndEndGlobalStates_,
            uint64 numBlocks,
            address asserter_,
            address challenger_,
            uint256 asserterTimeLeft_,
            uint256 challengerTimeLeft_
        ) external returns (uint64);

        function completeChallenge(uint256 challengeIndex_, address winner_, address loser_) external;
    }
}
