//! General purpose test contracts.
//!
//! Includes:
//! - Simple (counter with event, aliasing and call-context checks)
//! - PendingBlkTimeAndNrAdvanceCheck (asserts pending block time/number move forward)
//! - Benchmarks (gas-burning loops used to fill blocks)

use alloy_sol_types::sol;

sol! {
    /// Simple - counter contract used across system tests
    #[sol(rpc, abi, all_derives)]
    interface Simple {
        /// Emitted by `incrementEmit`
        event CounterEvent(uint64 count);

        /// Emitted by `incrementRedeem` with the retryable redeemer
        event RedeemedEvent(address caller, address redeemer);

        event NullEvent();

        /// Emitted by `logAndIncrement` before the counter changes
        event LogAndIncrementCalled(uint256 expected, uint256 have);

        function counter() external view returns (uint64);

        function increment() external;
        function logAndIncrement(uint256 expected) external;
        function incrementEmit() external;
        function incrementRedeem() external;
        function emitNullEvent() external;
        function noop() external;

        /// Always reverts
        function pleaseRevert() external;

        /// Sum of all recent block hashes, reverts if any is missing
        function checkBlockHashes() external view returns (uint256);

        function storeDifficulty() external;
        function getBlockDifficulty() external view returns (uint256);

        function checkIsTopLevelOrWasAliased(bool useTopLevel, bool expected) external view;

        function checkCalls(
            bool useTopLevel,
            bool directCase,
            bool staticCase,
            bool delegateCase,
            bool callcodeCase,
            bool callCase
        ) external returns (bool);

        /// Gas used by a static call to `to` with `input`
        function checkGasUsed(address to, bytes calldata input) external view returns (uint256);

        /// Post the same batch to a sequencer inbox `numberToPost` times
        function postManyBatches(address sequencerInbox, bytes memory batchData, uint256 numberToPost) external;
    }

    /// PendingBlkTimeAndNrAdvanceCheck - records deployment time and block
    #[sol(rpc, abi, all_derives)]
    interface PendingBlkTimeAndNrAdvanceCheck {
        function deployedAt() external view returns (uint256);
        function deployedAtBlock() external view returns (uint256);

        /// Reverts unless both timestamp and block number advanced since deployment
        function isAdvancing() external;
    }

    /// Benchmarks - loops until the block gas limit is exhausted
    #[sol(rpc, abi, all_derives)]
    interface Benchmarks {
        function fillBlockRecover() external payable;
        function fillBlockMulMod() external payable;
        function fillBlockHash() external payable;
        function fillBlockAdd() external payable;
        function fillBlockQuickStep() external payable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, keccak256};
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn test_increment_selector() {
        assert_eq!(Simple::incrementCall::SELECTOR, hex!("d09de08a"));
    }

    #[test]
    fn test_counter_event() {
        assert_eq!(Simple::CounterEvent::SIGNATURE, "CounterEvent(uint64)");
        assert_eq!(
            Simple::NullEvent::SIGNATURE_HASH,
            keccak256("NullEvent()")
        );
    }

    #[test]
    fn test_log_and_increment_encoding() {
        let call = Simple::logAndIncrementCall {
            expected: alloy_primitives::U256::from(5),
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4 + 32);
        assert_eq!(encoded[..4], Simple::logAndIncrementCall::SELECTOR);
        assert_eq!(encoded[35], 5);
    }
}
