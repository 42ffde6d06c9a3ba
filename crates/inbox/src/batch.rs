//! Sequencer batch encoding.

use alloy_primitives::{keccak256, B256};
use binding::bridge::TimeBounds;
use thiserror::Error;

/// Length of the packed batch header.
pub const HEADER_LENGTH: usize = 40;

pub const BROTLI_MESSAGE_HEADER_FLAG: u8 = 0x00;
pub const TREE_DAS_MESSAGE_HEADER_FLAG: u8 = 0x08;
pub const ZERO_HEAVY_MESSAGE_HEADER_FLAG: u8 = 0x20;
pub const DATA_AUTHENTICATED_FLAG: u8 = 0x40;
pub const DATA_BLOB_HEADER_FLAG: u8 = DATA_AUTHENTICATED_FLAG | 0x10;
pub const DAS_MESSAGE_HEADER_FLAG: u8 = 0x80;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// Calldata batches may not claim to be authenticated
    #[error("Invalid header flag {0:#04x} for a calldata batch")]
    InvalidHeaderFlag(u8),

    #[error("Batch of {size} bytes exceeds max data size {max}")]
    DataTooLarge { size: usize, max: usize },

    /// The new message count must not go backwards
    #[error("New message count {new} is below previous count {prev}")]
    BadMessageCounts { prev: u64, new: u64 },
}

/// Format of the batch payload, taken from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFlag {
    Brotli,
    ZeroHeavy,
    Das { tree: bool },
    BlobHashes,
    Unknown(u8),
}

impl BatchFlag {
    pub const fn from_byte(flag: u8) -> Self {
        if flag == DATA_BLOB_HEADER_FLAG {
            Self::BlobHashes
        } else if flag & DAS_MESSAGE_HEADER_FLAG != 0 {
            Self::Das {
                tree: flag & TREE_DAS_MESSAGE_HEADER_FLAG != 0,
            }
        } else if flag == BROTLI_MESSAGE_HEADER_FLAG {
            Self::Brotli
        } else if flag == ZERO_HEAVY_MESSAGE_HEADER_FLAG {
            Self::ZeroHeavy
        } else {
            Self::Unknown(flag)
        }
    }

    /// Flag of a batch, `None` for an empty batch.
    pub fn of(data: &[u8]) -> Option<Self> {
        data.first().map(|flag| Self::from_byte(*flag))
    }
}

/// Header the sequencer inbox prepends before hashing a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    pub time_bounds: TimeBounds,
    pub after_delayed_messages_read: u64,
}

impl BatchHeader {
    /// `abi.encodePacked(minTimestamp, maxTimestamp, minBlockNumber, maxBlockNumber, afterDelayedMessagesRead)`
    pub fn encode(&self) -> [u8; HEADER_LENGTH] {
        let bounds = &self.time_bounds;
        let words = [
            bounds.minTimestamp,
            bounds.maxTimestamp,
            bounds.minBlockNumber,
            bounds.maxBlockNumber,
            self.after_delayed_messages_read,
        ];

        let mut header = [0u8; HEADER_LENGTH];
        for (chunk, word) in header.chunks_exact_mut(8).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        header
    }

    /// Data hash committed to the sequencer accumulator.
    pub fn data_hash(&self, data: &[u8]) -> B256 {
        let mut preimage = Vec::with_capacity(HEADER_LENGTH + data.len());
        preimage.extend_from_slice(&self.encode());
        preimage.extend_from_slice(data);
        keccak256(preimage)
    }
}

/// Checks `addSequencerL2Batch(FromOrigin)` applies before accepting calldata.
pub fn validate_calldata_batch(
    data: &[u8],
    max_data_size: usize,
    prev_message_count: u64,
    new_message_count: u64,
) -> Result<(), BatchError> {
    if let Some(flag) = data.first() {
        if flag & DATA_AUTHENTICATED_FLAG != 0 {
            return Err(BatchError::InvalidHeaderFlag(*flag));
        }
    }

    if data.len().saturating_add(HEADER_LENGTH) > max_data_size {
        return Err(BatchError::DataTooLarge {
            size: data.len(),
            max: max_data_size,
        });
    }

    if new_message_count < prev_message_count {
        return Err(BatchError::BadMessageCounts {
            prev: prev_message_count,
            new: new_message_count,
        });
    }

    Ok(())
}
