//! Post sequencer batch action.
//!
//! Posts a calldata batch through `SequencerInboxStub.addSequencerL2BatchFromOrigin`
//! and checks the accumulator the inbox emitted for it.

use crate::{ensure_success, find_event, Action};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use binding::bridge::SequencerInboxStub::{self, SequencerBatchDelivered};
use inbox::{sequencer_accumulator, validate_calldata_batch, BatchFlag, BatchHeader};
use tracing::{info, warn};

/// Input data for posting a batch.
#[derive(Clone, Debug)]
pub struct PostBatch {
    pub sequencer_inbox: Address,
    /// Must equal the inbox's current batch count
    pub sequence_number: U256,
    pub data: Bytes,
    pub after_delayed_messages_read: U256,
    pub gas_refunder: Address,
    pub prev_message_count: u64,
    pub new_message_count: u64,
    /// Batch poster sending the transaction
    pub from: Address,
}

pub struct PostBatchAction<P> {
    provider: P,
    action: PostBatch,
}

impl<P> PostBatchAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: PostBatch) -> Self {
        Self { provider, action }
    }

    /// Checks that need no chain access.
    fn validate(&self) -> eyre::Result<()> {
        if self.action.sequencer_inbox == Address::ZERO {
            eyre::bail!("Sequencer inbox address is zero");
        }

        validate_calldata_batch(
            &self.action.data,
            usize::MAX,
            self.action.prev_message_count,
            self.action.new_message_count,
        )?;

        Ok(())
    }
}

impl<P> Action for PostBatchAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate().is_err() {
            return Ok(false);
        }

        let inbox = SequencerInboxStub::new(self.action.sequencer_inbox, &self.provider);

        if !inbox.isBatchPoster(self.action.from).call().await? {
            return Ok(false);
        }

        let max_data_size = inbox.maxDataSize().call().await?;
        if validate_calldata_batch(
            &self.action.data,
            max_data_size.saturating_to::<usize>(),
            self.action.prev_message_count,
            self.action.new_message_count,
        )
        .is_err()
        {
            return Ok(false);
        }

        let batch_count = inbox.batchCount().call().await?;
        Ok(batch_count == self.action.sequence_number)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let inbox = SequencerInboxStub::new(self.action.sequencer_inbox, &self.provider);
        let batch_count = inbox.batchCount().call().await?;
        Ok(batch_count > self.action.sequence_number)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if self.is_completed().await? {
            eyre::bail!("Batch {} already posted", self.action.sequence_number)
        }

        if let Some(BatchFlag::Unknown(flag)) = BatchFlag::of(&self.action.data) {
            warn!(flag, "Batch data starts with an unknown header flag");
        }

        let inbox = SequencerInboxStub::new(self.action.sequencer_inbox, &self.provider);
        let receipt = inbox
            .addSequencerL2BatchFromOrigin(
                self.action.sequence_number,
                self.action.data.clone(),
                self.action.after_delayed_messages_read,
                self.action.gas_refunder,
                U256::from(self.action.prev_message_count),
                U256::from(self.action.new_message_count),
            )
            .send()
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        let delivered = find_event::<SequencerBatchDelivered>(&receipt)?;
        let computed = expected_after_acc(&delivered, &self.action.data)?;
        if computed != delivered.afterAcc {
            eyre::bail!(
                "Batch {} afterAcc {} does not match computed {}",
                delivered.batchSequenceNumber,
                delivered.afterAcc,
                computed
            );
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            batch = %delivered.batchSequenceNumber,
            after_acc = %delivered.afterAcc,
            "Batch posted."
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Post batch {} ({} bytes, messages {} -> {})",
            self.action.sequence_number,
            self.action.data.len(),
            self.action.prev_message_count,
            self.action.new_message_count
        )
    }
}

/// Sequencer accumulator a delivered calldata batch must end up with.
fn expected_after_acc(delivered: &SequencerBatchDelivered, data: &[u8]) -> eyre::Result<B256> {
    let after_delayed_messages_read = u64::try_from(delivered.afterDelayedMessagesRead)
        .map_err(|_| eyre::eyre!("afterDelayedMessagesRead does not fit in u64"))?;

    let header = BatchHeader {
        time_bounds: delivered.timeBounds.clone(),
        after_delayed_messages_read,
    };

    Ok(sequencer_accumulator(
        delivered.beforeAcc,
        header.data_hash(data),
        delivered.delayedAcc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use binding::bridge::{BatchDataLocation, TimeBounds};

    fn mock_batch() -> PostBatch {
        PostBatch {
            sequencer_inbox: Address::repeat_byte(1),
            sequence_number: U256::from(3),
            data: Bytes::from_static(&[0x00, 0xde, 0xad]),
            after_delayed_messages_read: U256::from(1),
            gas_refunder: Address::ZERO,
            prev_message_count: 10,
            new_message_count: 12,
            from: Address::repeat_byte(2),
        }
    }

    #[test]
    fn test_validate_success() {
        let action = PostBatchAction::new(MockProvider, mock_batch());
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_message_counts_go_backwards() {
        let mut batch = mock_batch();
        batch.new_message_count = 9;
        let action = PostBatchAction::new(MockProvider, batch);

        let err = action.validate().unwrap_err();
        assert!(err.to_string().contains("below previous count"));
    }

    #[test]
    fn test_validate_equal_message_counts() {
        let mut batch = mock_batch();
        batch.new_message_count = batch.prev_message_count;
        let action = PostBatchAction::new(MockProvider, batch);
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_authenticated_flag() {
        let mut batch = mock_batch();
        batch.data = Bytes::from_static(&[0x40, 0x01]);
        let action = PostBatchAction::new(MockProvider, batch);

        let err = action.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid header flag"));
    }

    #[test]
    fn test_validate_zero_inbox() {
        let mut batch = mock_batch();
        batch.sequencer_inbox = Address::ZERO;
        let action = PostBatchAction::new(MockProvider, batch);
        assert!(action.validate().is_err());
    }

    #[test]
    fn test_expected_after_acc() {
        let time_bounds = TimeBounds {
            minTimestamp: 100,
            maxTimestamp: 200,
            minBlockNumber: 10,
            maxBlockNumber: 20,
        };
        let data = [0x00, 0x01, 0x02];
        let header = BatchHeader {
            time_bounds: time_bounds.clone(),
            after_delayed_messages_read: 1,
        };
        let before = B256::repeat_byte(0xb0);
        let delayed = B256::repeat_byte(0xd0);
        let after = sequencer_accumulator(before, header.data_hash(&data), delayed);

        let delivered = SequencerBatchDelivered {
            batchSequenceNumber: U256::from(3),
            beforeAcc: before,
            afterAcc: after,
            delayedAcc: delayed,
            afterDelayedMessagesRead: U256::from(1),
            timeBounds: time_bounds,
            dataLocation: BatchDataLocation::TxInput,
        };

        assert_eq!(expected_after_acc(&delivered, &data).unwrap(), after);
        assert_ne!(expected_after_acc(&delivered, &data[..2]).unwrap(), after);
    }

    #[test]
    fn test_description() {
        let action = PostBatchAction::new(MockProvider, mock_batch());
        assert_eq!(action.description(), "Post batch 3 (3 bytes, messages 10 -> 12)");
    }
}
