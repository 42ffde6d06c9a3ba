//! Off-chain checks for the bridge and inbox mocks.
//!
//! Recomputes the hashes the mocks emit (delayed message hashes, inbox
//! accumulators, batch data hashes, address aliases) and scans a bridge for
//! its delivered messages and batches.

pub mod accumulator;
pub mod alias;
pub mod batch;
pub mod message;
pub mod state;

pub use accumulator::{
    accumulate_inbox_message, sequencer_accumulator, AccumulatorError, DelayedInboxTracker,
};
pub use alias::{apply_l1_to_l2_alias, undo_l1_to_l2_alias, L1_TO_L2_ALIAS_OFFSET};
pub use batch::{validate_calldata_batch, BatchError, BatchFlag, BatchHeader, HEADER_LENGTH};
pub use message::{init_message_data, l2_message_data_hash, DelayedMessage, L1MessageType};
pub use state::{
    verify_batch_chain, DeliveredMessage, InboxStateProvider, SequencerBatch,
};
