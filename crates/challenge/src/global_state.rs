use alloy_primitives::{keccak256, B256};
use binding::challenge::GlobalState;

/// Named view of a machine `GlobalState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlobalStateView {
    pub block_hash: B256,
    pub send_root: B256,
    /// Inbox batch the machine is reading
    pub batch: u64,
    pub pos_in_batch: u64,
}

impl GlobalStateView {
    pub const fn new(block_hash: B256, send_root: B256, batch: u64, pos_in_batch: u64) -> Self {
        Self {
            block_hash,
            send_root,
            batch,
            pos_in_batch,
        }
    }

    /// `GlobalStateLib.hash`.
    pub fn hash(&self) -> B256 {
        let mut packed = Vec::with_capacity(13 + 64 + 16);
        packed.extend_from_slice(b"Global state:");
        packed.extend_from_slice(self.block_hash.as_slice());
        packed.extend_from_slice(self.send_root.as_slice());
        packed.extend_from_slice(&self.batch.to_be_bytes());
        packed.extend_from_slice(&self.pos_in_batch.to_be_bytes());
        keccak256(packed)
    }
}

impl From<GlobalState> for GlobalStateView {
    fn from(state: GlobalState) -> Self {
        Self {
            block_hash: state.bytes32Vals[0],
            send_root: state.bytes32Vals[1],
            batch: state.u64Vals[0],
            pos_in_batch: state.u64Vals[1],
        }
    }
}

impl From<GlobalStateView> for GlobalState {
    fn from(view: GlobalStateView) -> Self {
        Self {
            bytes32Vals: [view.block_hash, view.send_root],
            u64Vals: [view.batch, view.pos_in_batch],
        }
    }
}
