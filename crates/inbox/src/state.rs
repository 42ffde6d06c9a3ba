use crate::{
    accumulator::{sequencer_accumulator, DelayedInboxTracker},
    message::DelayedMessage,
};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::{BlockNumberOrTag, Log};
use binding::bridge::{BatchDataLocation, BridgeStub, SequencerInboxStub, TimeBounds};
use client::scan::{chunks, resolve_block_range, scan_with_retry, DEFAULT_CHUNK_SIZE};
use tracing::{debug, info, warn};

/// A delayed message together with where it was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    pub message: DelayedMessage,
    pub before_acc: B256,
    pub inbox: Address,
    pub tx_hash: Option<B256>,
}

/// A `SequencerBatchDelivered` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerBatch {
    pub sequence_number: U256,
    pub before_acc: B256,
    pub after_acc: B256,
    pub delayed_acc: B256,
    pub after_delayed_messages_read: U256,
    pub time_bounds: TimeBounds,
    pub data_location: BatchDataLocation,
    pub l1_block: u64,
}

/// Reads inbox state from a bridge and its sequencer inbox.
pub struct InboxStateProvider<P> {
    provider: P,
    bridge: Address,
    sequencer_inbox: Option<Address>,
    chunk_size: u64,
}

impl<P> InboxStateProvider<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, bridge: Address) -> Self {
        Self {
            provider,
            bridge,
            sequencer_inbox: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub const fn with_sequencer_inbox(mut self, sequencer_inbox: Address) -> Self {
        self.sequencer_inbox = Some(sequencer_inbox);
        self
    }

    /// Override the scan chunk size, zero keeps the default.
    pub const fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        if chunk_size > 0 {
            self.chunk_size = chunk_size;
        }
        self
    }

    pub async fn delayed_message_count(&self) -> eyre::Result<U256> {
        let bridge = BridgeStub::new(self.bridge, &self.provider);
        Ok(bridge.delayedMessageCount().call().await?)
    }

    pub async fn sequencer_message_count(&self) -> eyre::Result<U256> {
        let bridge = BridgeStub::new(self.bridge, &self.provider);
        Ok(bridge.sequencerMessageCount().call().await?)
    }

    /// Delayed accumulator stored by the bridge at `index`.
    pub async fn delayed_acc(&self, index: U256) -> eyre::Result<B256> {
        let bridge = BridgeStub::new(self.bridge, &self.provider);
        Ok(bridge.delayedInboxAccs(index).call().await?)
    }

    /// Get all delayed messages delivered in the given block range.
    ///
    /// Both ends are resolved to block numbers before scanning so every chunk
    /// sees the same snapshot.
    pub async fn get_delayed_messages(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<DeliveredMessage>> {
        let (from, to) = resolve_block_range(&self.provider, from_block, to_block).await?;

        debug!(from, to, bridge = %self.bridge, "Scanning for delayed messages");

        let mut messages = Vec::new();
        for (start, end) in chunks(from, to, self.chunk_size) {
            let chunk = scan_with_retry(start, end, || self.scan_delayed_chunk(start, end)).await?;
            messages.extend(chunk);
        }

        Ok(messages)
    }

    /// Replay `messages` against the bridge accumulators.
    ///
    /// The chain is seeded from the accumulator before the first message and
    /// the final value is compared to what the bridge stores. Returns that
    /// accumulator, or `None` when there is nothing to verify.
    pub async fn verify_delayed_messages(
        &self,
        messages: &[DeliveredMessage],
    ) -> eyre::Result<Option<B256>> {
        let Some(first) = messages.first() else {
            return Ok(None);
        };

        let start = first.message.inbox_seq_num;
        let seed = if start.is_zero() {
            B256::ZERO
        } else {
            self.delayed_acc(start - U256::from(1)).await?
        };

        let mut tracker = DelayedInboxTracker::resume(start, seed);
        for delivered in messages {
            tracker.push(&delivered.message, delivered.before_acc)?;
        }

        let last = tracker.next_index() - U256::from(1);
        let onchain = self.delayed_acc(last).await?;
        if onchain != tracker.acc() {
            eyre::bail!(
                "Delayed accumulator {} does not match bridge value {} at index {}",
                tracker.acc(),
                onchain,
                last
            );
        }

        info!(
            first = %start,
            last = %last,
            acc = %onchain,
            "Delayed inbox accumulators verified"
        );

        Ok(Some(onchain))
    }

    /// Get all sequencer batches delivered in the given block range.
    pub async fn get_sequencer_batches(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<SequencerBatch>> {
        let Some(sequencer_inbox) = self.sequencer_inbox else {
            eyre::bail!("Sequencer inbox address is not set");
        };

        let (from, to) = resolve_block_range(&self.provider, from_block, to_block).await?;

        debug!(from, to, sequencer_inbox = %sequencer_inbox, "Scanning for sequencer batches");

        let mut batches = Vec::new();
        for (start, end) in chunks(from, to, self.chunk_size) {
            let chunk = scan_with_retry(start, end, || {
                self.scan_batch_chunk(sequencer_inbox, start, end)
            })
            .await?;
            batches.extend(chunk);
        }

        Ok(batches)
    }

    async fn scan_delayed_chunk(&self, from: u64, to: u64) -> eyre::Result<Vec<DeliveredMessage>> {
        let bridge = BridgeStub::new(self.bridge, &self.provider);
        let events = bridge
            .MessageDelivered_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await?;

        let mut messages = Vec::with_capacity(events.len());
        for (event, log) in events {
            let Some(block_number) = log.block_number else {
                warn!(index = %event.messageIndex, "Skipping pending MessageDelivered log");
                continue;
            };

            messages.push(DeliveredMessage {
                message: DelayedMessage::from_event(&event, block_number),
                before_acc: event.beforeInboxAcc,
                inbox: event.inbox,
                tx_hash: log.transaction_hash,
            });
        }

        Ok(messages)
    }

    async fn scan_batch_chunk(
        &self,
        sequencer_inbox: Address,
        from: u64,
        to: u64,
    ) -> eyre::Result<Vec<SequencerBatch>> {
        let inbox = SequencerInboxStub::new(sequencer_inbox, &self.provider);
        let events = inbox
            .SequencerBatchDelivered_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await?;

        Ok(events
            .into_iter()
            .filter_map(|(event, log)| sequencer_batch(event, &log))
            .collect())
    }
}

/// Build a batch record from its log, `None` for logs not yet in a block.
fn sequencer_batch(
    event: SequencerInboxStub::SequencerBatchDelivered,
    log: &Log,
) -> Option<SequencerBatch> {
    let Some(l1_block) = log.block_number else {
        warn!(
            sequence_number = %event.batchSequenceNumber,
            "Skipping pending SequencerBatchDelivered log"
        );
        return None;
    };

    Some(SequencerBatch {
        sequence_number: event.batchSequenceNumber,
        before_acc: event.beforeAcc,
        after_acc: event.afterAcc,
        delayed_acc: event.delayedAcc,
        after_delayed_messages_read: event.afterDelayedMessagesRead,
        time_bounds: event.timeBounds,
        data_location: event.dataLocation,
        l1_block,
    })
}

/// Check that consecutive batches link up and each `afterAcc` commits to `data_hash`.
///
/// `data_hash` returns the batch data hash when it is known, batches without
/// one are only checked for linkage.
pub fn verify_batch_chain<F>(batches: &[SequencerBatch], mut data_hash: F) -> eyre::Result<()>
where
    F: FnMut(&SequencerBatch) -> Option<B256>,
{
    for pair in batches.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.sequence_number != prev.sequence_number + U256::from(1) {
            eyre::bail!(
                "Batch {} does not follow batch {}",
                next.sequence_number,
                prev.sequence_number
            );
        }
        if next.before_acc != prev.after_acc {
            eyre::bail!(
                "Batch {} beforeAcc {} does not match previous afterAcc {}",
                next.sequence_number,
                next.before_acc,
                prev.after_acc
            );
        }
    }

    for batch in batches {
        if let Some(hash) = data_hash(batch) {
            let expected = sequencer_accumulator(batch.before_acc, hash, batch.delayed_acc);
            if expected != batch.after_acc {
                eyre::bail!(
                    "Batch {} afterAcc {} does not match computed {}",
                    batch.sequence_number,
                    batch.after_acc,
                    expected
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_provider::{network::Ethereum, RootProvider};

    /// Provider for calls that return before reaching the node.
    #[derive(Clone)]
    struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }

    fn state() -> InboxStateProvider<MockProvider> {
        InboxStateProvider::new(MockProvider, Address::repeat_byte(0xb1))
    }

    fn batch(index: u64, before: B256, data_hash: B256) -> SequencerBatch {
        let delayed_acc = B256::repeat_byte(0xdd);
        SequencerBatch {
            sequence_number: U256::from(index),
            before_acc: before,
            after_acc: sequencer_accumulator(before, data_hash, delayed_acc),
            delayed_acc,
            after_delayed_messages_read: U256::from(1),
            time_bounds: TimeBounds {
                minTimestamp: 0,
                maxTimestamp: 10,
                minBlockNumber: 0,
                maxBlockNumber: 10,
            },
            data_location: BatchDataLocation::TxInput,
            l1_block: 5 + index,
        }
    }

    #[test]
    fn test_verify_batch_chain() {
        let hash0 = B256::repeat_byte(1);
        let hash1 = B256::repeat_byte(2);
        let first = batch(0, B256::ZERO, hash0);
        let second = batch(1, first.after_acc, hash1);
        let batches = vec![first, second];

        let hashes = [hash0, hash1];
        verify_batch_chain(&batches, |b| Some(hashes[b.sequence_number.to::<usize>()])).unwrap();
        verify_batch_chain(&batches, |_| None).unwrap();
    }

    #[test]
    fn test_verify_batch_chain_rejects_broken_link() {
        let first = batch(0, B256::ZERO, B256::repeat_byte(1));
        let second = batch(1, B256::repeat_byte(0xee), B256::repeat_byte(2));
        assert!(verify_batch_chain(&[first, second], |_| None).is_err());
    }

    #[test]
    fn test_verify_batch_chain_rejects_wrong_data_hash() {
        let only = batch(0, B256::ZERO, B256::repeat_byte(1));
        let err = verify_batch_chain(&[only], |_| Some(B256::repeat_byte(9))).unwrap_err();
        assert!(err.to_string().contains("does not match computed"));
    }

    #[test]
    fn test_verify_batch_chain_rejects_gap() {
        let first = batch(0, B256::ZERO, B256::repeat_byte(1));
        let third = batch(2, first.after_acc, B256::repeat_byte(2));
        assert!(verify_batch_chain(&[first, third], |_| None).is_err());
    }

    #[tokio::test]
    async fn test_verify_delayed_messages_empty() {
        assert_eq!(state().verify_delayed_messages(&[]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_delayed_messages_rejects_reversed_range() {
        let result = state()
            .get_delayed_messages(BlockNumberOrTag::Number(10), BlockNumberOrTag::Number(5))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_sequencer_batches_requires_inbox() {
        let err = state()
            .get_sequencer_batches(BlockNumberOrTag::Earliest, BlockNumberOrTag::Number(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Sequencer inbox address is not set"));

        let result = state()
            .with_sequencer_inbox(Address::repeat_byte(0x5e))
            .get_sequencer_batches(BlockNumberOrTag::Number(10), BlockNumberOrTag::Number(5))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_sequencer_batch_skips_pending_log() {
        let delivered = batch(3, B256::repeat_byte(7), B256::repeat_byte(8));
        let event = SequencerInboxStub::SequencerBatchDelivered {
            batchSequenceNumber: delivered.sequence_number,
            beforeAcc: delivered.before_acc,
            afterAcc: delivered.after_acc,
            delayedAcc: delivered.delayed_acc,
            afterDelayedMessagesRead: delivered.after_delayed_messages_read,
            timeBounds: delivered.time_bounds.clone(),
            dataLocation: delivered.data_location,
        };

        assert_eq!(sequencer_batch(event.clone(), &Log::default()), None);

        let mined = Log {
            block_number: Some(delivered.l1_block),
            ..Default::default()
        };
        assert_eq!(sequencer_batch(event, &mined), Some(delivered));
    }
}
