//! Create challenge action.
//!
//! Starts a block challenge through `MockResultReceiver.createChallenge`, which
//! forwards to its challenge manager.

use crate::{ensure_success, find_event, Action};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use binding::challenge::{
    GlobalState, MachineStatus, MockResultReceiver,
    SingleExecutionChallenge::InitiatedChallenge,
};
use challenge::GlobalStateView;
use tracing::info;

/// Input data for creating a challenge.
#[derive(Clone, Debug)]
pub struct CreateChallenge {
    pub result_receiver: Address,
    pub wasm_module_root: B256,
    pub start: GlobalStateView,
    pub end: GlobalStateView,
    pub num_blocks: u64,
    pub asserter: Address,
    pub challenger: Address,
    pub asserter_time_left: U256,
    pub challenger_time_left: U256,
    /// Set once the challenge was created
    pub tx_hash: Option<B256>,
}

pub struct CreateChallengeAction<P> {
    provider: P,
    action: CreateChallenge,
}

impl<P> CreateChallengeAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: CreateChallenge) -> Self {
        Self { provider, action }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.result_receiver == Address::ZERO {
            eyre::bail!("Result receiver address is zero");
        }

        if self.action.asserter == Address::ZERO || self.action.challenger == Address::ZERO {
            eyre::bail!("Asserter and challenger must be set");
        }

        if self.action.asserter == self.action.challenger {
            eyre::bail!("Asserter and challenger are the same account");
        }

        if self.action.num_blocks == 0 {
            eyre::bail!("Challenge must cover at least one block");
        }

        Ok(())
    }

    fn is_ours(&self, event: &InitiatedChallenge) -> bool {
        GlobalStateView::from(event.startState.clone()) == self.action.start
            && GlobalStateView::from(event.endState.clone()) == self.action.end
    }
}

impl<P> Action for CreateChallengeAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate().is_err() {
            return Ok(false);
        }

        let receiver = MockResultReceiver::new(self.action.result_receiver, &self.provider);
        Ok(receiver.manager().call().await? != Address::ZERO)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(tx_hash) = self.action.tx_hash else {
            return Ok(false);
        };

        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(false);
        };

        let Ok(event) = find_event::<InitiatedChallenge>(&receipt) else {
            return Ok(false);
        };

        Ok(self.is_ours(&event))
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if self.is_completed().await? {
            eyre::bail!("Challenge already created")
        }

        let receiver = MockResultReceiver::new(self.action.result_receiver, &self.provider);
        let states: [GlobalState; 2] = [self.action.start.into(), self.action.end.into()];

        let receipt = receiver
            .createChallenge(
                self.action.wasm_module_root,
                [MachineStatus::FINISHED, MachineStatus::FINISHED],
                states,
                self.action.num_blocks,
                self.action.asserter,
                self.action.challenger,
                self.action.asserter_time_left,
                self.action.challenger_time_left,
            )
            .send()
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        let event = find_event::<InitiatedChallenge>(&receipt)?;
        if !self.is_ours(&event) {
            eyre::bail!(
                "Challenge {} was initiated with different global states",
                event.challengeIndex
            );
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            challenge_index = event.challengeIndex,
            start_hash = %self.action.start.hash(),
            end_hash = %self.action.end.hash(),
            "Challenge created."
        );

        self.action.tx_hash = Some(receipt.transaction_hash);

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Challenge {} blocks asserted by {} (challenger {})",
            self.action.num_blocks, self.action.asserter, self.action.challenger
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;

    fn mock_challenge() -> CreateChallenge {
        CreateChallenge {
            result_receiver: Address::repeat_byte(1),
            wasm_module_root: B256::repeat_byte(0x77),
            start: GlobalStateView::default(),
            end: GlobalStateView::new(B256::repeat_byte(2), B256::repeat_byte(3), 1, 0),
            num_blocks: 4,
            asserter: Address::repeat_byte(4),
            challenger: Address::repeat_byte(5),
            asserter_time_left: U256::from(1_000),
            challenger_time_left: U256::from(1_000),
            tx_hash: None,
        }
    }

    #[test]
    fn test_validate_success() {
        let action = CreateChallengeAction::new(MockProvider, mock_challenge());
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_same_participants() {
        let mut challenge = mock_challenge();
        challenge.challenger = challenge.asserter;
        let action = CreateChallengeAction::new(MockProvider, challenge);

        let err = action.validate().unwrap_err();
        assert!(err.to_string().contains("same account"));
    }

    #[test]
    fn test_validate_zero_blocks() {
        let mut challenge = mock_challenge();
        challenge.num_blocks = 0;
        let action = CreateChallengeAction::new(MockProvider, challenge);
        assert!(action.validate().is_err());
    }

    #[test]
    fn test_validate_zero_receiver() {
        let mut challenge = mock_challenge();
        challenge.result_receiver = Address::ZERO;
        let action = CreateChallengeAction::new(MockProvider, challenge);

        let err = action.validate().unwrap_err();
        assert!(err.to_string().contains("Result receiver"));
    }

    #[test]
    fn test_is_ours() {
        let action = CreateChallengeAction::new(MockProvider, mock_challenge());
        let challenge = mock_challenge();

        let event = InitiatedChallenge {
            challengeIndex: 0,
            startState: challenge.start.into(),
            endState: challenge.end.into(),
        };
        assert!(action.is_ours(&event));

        let other = InitiatedChallenge {
            challengeIndex: 0,
            startState: challenge.end.into(),
            endState: challenge.start.into(),
        };
        assert!(!action.is_ours(&other));
    }

    #[tokio::test]
    async fn test_is_completed_without_tx() {
        let action = CreateChallengeAction::new(MockProvider, mock_challenge());
        assert!(!action.is_completed().await.unwrap());
    }
}
