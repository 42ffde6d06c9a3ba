//! Helpers around the challenge manager mocks.
//!
//! Mirrors the hashes a challenge commits to and reads challenge status and
//! lifecycle events from a deployed manager.

pub mod global_state;
pub mod hash;
pub mod state;

pub use global_state::GlobalStateView;
pub use hash::{block_state_hash, challenge_state_hash, HashError};
pub use state::{
    latest_by_challenge, ChallengeEvent, ChallengeStateProvider, ChallengeStatus, Completion,
};
