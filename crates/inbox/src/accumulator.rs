//! Inbox accumulators kept by the bridge.
//!
//! Both inboxes are append-only hash chains. Entry `n` of the delayed chain is
//! `keccak256(acc[n-1] ‖ messageHash)` with a zero predecessor for the first
//! message; entry `n` of the sequencer chain also commits to the delayed
//! accumulator the batch read up to.

use crate::message::DelayedMessage;
use alloy_primitives::{keccak256, B256, U256};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccumulatorError {
    /// Messages must be replayed in order without gaps
    #[error("Expected delayed message {expected}, got {actual}")]
    IndexGap { expected: U256, actual: U256 },

    /// The event's `beforeInboxAcc` disagrees with the replayed chain
    #[error("Accumulator mismatch before message {index}: replayed {replayed}, event has {reported}")]
    Mismatch {
        index: U256,
        replayed: B256,
        reported: B256,
    },
}

/// `Messages.accumulateInboxMessage`.
pub fn accumulate_inbox_message(prev_acc: B256, message_hash: B256) -> B256 {
    let mut packed = [0u8; 64];
    packed[..32].copy_from_slice(prev_acc.as_slice());
    packed[32..].copy_from_slice(message_hash.as_slice());
    keccak256(packed)
}

/// Sequencer inbox entry for a batch.
pub fn sequencer_accumulator(before_acc: B256, data_hash: B256, delayed_acc: B256) -> B256 {
    let mut packed = [0u8; 96];
    packed[..32].copy_from_slice(before_acc.as_slice());
    packed[32..64].copy_from_slice(data_hash.as_slice());
    packed[64..].copy_from_slice(delayed_acc.as_slice());
    keccak256(packed)
}

/// Replays `MessageDelivered` events and checks the delayed hash chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedInboxTracker {
    next_index: U256,
    acc: B256,
}

impl Default for DelayedInboxTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayedInboxTracker {
    /// Tracker for an empty delayed inbox.
    pub const fn new() -> Self {
        Self {
            next_index: U256::ZERO,
            acc: B256::ZERO,
        }
    }

    /// Continue from message `next_index` whose predecessor accumulator is `acc`.
    pub const fn resume(next_index: U256, acc: B256) -> Self {
        Self { next_index, acc }
    }

    pub const fn next_index(&self) -> U256 {
        self.next_index
    }

    /// Accumulator after the last replayed message.
    pub const fn acc(&self) -> B256 {
        self.acc
    }

    /// Append a message, checking it against the `beforeInboxAcc` reported for it.
    ///
    /// The tracker is left untouched on error.
    pub fn push(
        &mut self,
        message: &DelayedMessage,
        reported_before_acc: B256,
    ) -> Result<B256, AccumulatorError> {
        if message.inbox_seq_num != self.next_index {
            return Err(AccumulatorError::IndexGap {
                expected: self.next_index,
                actual: message.inbox_seq_num,
            });
        }

        if reported_before_acc != self.acc {
            return Err(AccumulatorError::Mismatch {
                index: message.inbox_seq_num,
                replayed: self.acc,
                reported: reported_before_acc,
            });
        }

        self.acc = accumulate_inbox_message(self.acc, message.hash());
        self.next_index += U256::from(1);

        Ok(self.acc)
    }
}
