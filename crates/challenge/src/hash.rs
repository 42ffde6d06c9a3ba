//! Hashes committed to by the challenge manager.

use alloy_primitives::{keccak256, B256, U256};
use binding::challenge::MachineStatus;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HashError {
    /// Only finished, errored and too-far machines have a block state hash
    #[error("Machine status {0:?} has no block state hash")]
    BadBlockStatus(MachineStatus),
}

/// `ChallengeLib.blockStateHash`.
pub fn block_state_hash(status: MachineStatus, global_state_hash: B256) -> Result<B256, HashError> {
    match status {
        MachineStatus::FINISHED => Ok(keccak256(
            [b"Block state:".as_slice(), global_state_hash.as_slice()].concat(),
        )),
        MachineStatus::ERRORED => Ok(keccak256(
            [b"Block state, errored:".as_slice(), global_state_hash.as_slice()].concat(),
        )),
        MachineStatus::TOO_FAR => Ok(keccak256(b"Block state, too far:")),
        other => Err(HashError::BadBlockStatus(other)),
    }
}

/// `ChallengeLib.hashChallengeState`, the commitment to a bisection.
pub fn challenge_state_hash(segments_start: U256, segments_length: U256, segments: &[B256]) -> B256 {
    let mut packed = Vec::with_capacity(64 + 32 * segments.len());
    packed.extend_from_slice(&segments_start.to_be_bytes::<32>());
    packed.extend_from_slice(&segments_length.to_be_bytes::<32>());
    for segment in segments {
        packed.extend_from_slice(segment.as_slice());
    }
    keccak256(packed)
}
