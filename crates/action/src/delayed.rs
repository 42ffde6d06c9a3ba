//! Delayed inbox actions.
//!
//! Messages enter the delayed inbox either through `InboxStub.sendL2Message`
//! or, for an allowed inbox, directly through `BridgeStub.enqueueDelayedMessage`.

use crate::{ensure_success, find_event, Action};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::Provider;
use binding::bridge::{
    BridgeStub::{self, MessageDelivered},
    InboxStub::{self, InboxMessageDelivered},
};
use inbox::{accumulate_inbox_message, l2_message_data_hash, DelayedMessage, L1MessageType};
use tracing::info;

/// Input data for sending an L2 message through the inbox.
#[derive(Clone, Debug)]
pub struct SendL2Message {
    pub inbox: Address,
    pub data: Bytes,
    /// Set once the message was sent
    pub tx_hash: Option<B256>,
}

pub struct SendL2MessageAction<P> {
    provider: P,
    action: SendL2Message,
}

impl<P> SendL2MessageAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: SendL2Message) -> Self {
        Self { provider, action }
    }

    pub const fn tx_hash(&self) -> Option<B256> {
        self.action.tx_hash
    }
}

impl<P> Action for SendL2MessageAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.inbox == Address::ZERO {
            return Ok(false);
        }

        let inbox = InboxStub::new(self.action.inbox, &self.provider);
        Ok(!inbox.paused().call().await?)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(tx_hash) = self.action.tx_hash else {
            return Ok(false);
        };

        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(false);
        };

        let Ok(delivered) = find_event::<InboxMessageDelivered>(&receipt) else {
            return Ok(false);
        };

        Ok(delivered.data == self.action.data)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        if self.is_completed().await? {
            eyre::bail!("L2 message already sent")
        }

        let inbox = InboxStub::new(self.action.inbox, &self.provider);
        let receipt = inbox
            .sendL2Message(self.action.data.clone())
            .send()
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        let delivered = find_event::<InboxMessageDelivered>(&receipt)?;
        let bridged = find_event::<MessageDelivered>(&receipt)?;

        if bridged.messageDataHash != l2_message_data_hash(&self.action.data) {
            eyre::bail!(
                "Bridge recorded data hash {} for message {}",
                bridged.messageDataHash,
                delivered.messageNum
            );
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            message_num = %delivered.messageNum,
            before_acc = %bridged.beforeInboxAcc,
            "L2 message sent."
        );

        self.action.tx_hash = Some(receipt.transaction_hash);

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Send {} byte L2 message via inbox {}",
            self.action.data.len(),
            self.action.inbox
        )
    }
}

/// Input data for enqueueing a message on the bridge directly.
#[derive(Clone, Debug)]
pub struct EnqueueDelayed {
    pub bridge: Address,
    pub kind: u8,
    pub sender: Address,
    pub message_data_hash: B256,
    /// Account sending the transaction, must be an allowed delayed inbox
    pub from: Address,
    pub tx_hash: Option<B256>,
}

pub struct EnqueueDelayedAction<P> {
    provider: P,
    action: EnqueueDelayed,
}

impl<P> EnqueueDelayedAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: EnqueueDelayed) -> Self {
        Self { provider, action }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.bridge == Address::ZERO {
            eyre::bail!("Bridge address is zero");
        }

        if L1MessageType::try_from(self.action.kind).is_err() {
            eyre::bail!("Unknown message kind {}", self.action.kind);
        }

        Ok(())
    }
}

impl<P> Action for EnqueueDelayedAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate().is_err() {
            return Ok(false);
        }

        let bridge = BridgeStub::new(self.action.bridge, &self.provider);
        Ok(bridge.allowedDelayedInboxes(self.action.from).call().await?)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(tx_hash) = self.action.tx_hash else {
            return Ok(false);
        };

        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(false);
        };

        let Ok(event) = find_event::<MessageDelivered>(&receipt) else {
            return Ok(false);
        };

        Ok(event.kind == self.action.kind
            && event.sender == self.action.sender
            && event.messageDataHash == self.action.message_data_hash)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if self.is_completed().await? {
            eyre::bail!("Delayed message already enqueued")
        }

        let bridge = BridgeStub::new(self.action.bridge, &self.provider);
        let receipt = bridge
            .enqueueDelayedMessage(
                self.action.kind,
                self.action.sender,
                self.action.message_data_hash,
            )
            .send()
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt)?;

        let event = find_event::<MessageDelivered>(&receipt)?;
        let block_number = receipt
            .block_number
            .ok_or_else(|| eyre::eyre!("Receipt {} has no block number", receipt.transaction_hash))?;
        let message = DelayedMessage::from_event(&event, block_number);
        let acc = accumulate_inbox_message(event.beforeInboxAcc, message.hash());

        let stored = bridge.delayedInboxAccs(event.messageIndex).call().await?;
        if stored != acc {
            eyre::bail!(
                "Bridge accumulator {} at index {} does not match computed {}",
                stored,
                event.messageIndex,
                acc
            );
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number,
            message_index = %event.messageIndex,
            acc = %acc,
            "Delayed message enqueued."
        );

        self.action.tx_hash = Some(receipt.transaction_hash);

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        let kind = L1MessageType::try_from(self.action.kind)
            .map(|kind| kind.to_string())
            .unwrap_or_else(|kind| format!("Unknown({kind})"));
        format!(
            "Enqueue {} message from {} on bridge {}",
            kind, self.action.sender, self.action.bridge
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;

    fn mock_enqueue() -> EnqueueDelayed {
        EnqueueDelayed {
            bridge: Address::repeat_byte(1),
            kind: L1MessageType::L2Message.as_u8(),
            sender: Address::repeat_byte(2),
            message_data_hash: B256::repeat_byte(3),
            from: Address::repeat_byte(4),
            tx_hash: None,
        }
    }

    #[test]
    fn test_validate_success() {
        let action = EnqueueDelayedAction::new(MockProvider, mock_enqueue());
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_bridge() {
        let mut enqueue = mock_enqueue();
        enqueue.bridge = Address::ZERO;
        let action = EnqueueDelayedAction::new(MockProvider, enqueue);

        let result = action.validate();
        assert!(result.unwrap_err().to_string().contains("Bridge"));
    }

    #[test]
    fn test_validate_unknown_kind() {
        let mut enqueue = mock_enqueue();
        enqueue.kind = 42;
        let action = EnqueueDelayedAction::new(MockProvider, enqueue);

        let result = action.validate();
        assert!(result.unwrap_err().to_string().contains("Unknown message kind 42"));
    }

    #[test]
    fn test_enqueue_description() {
        let action = EnqueueDelayedAction::new(MockProvider, mock_enqueue());
        assert!(action.description().starts_with("Enqueue L2Message(3) message"));

        let mut enqueue = mock_enqueue();
        enqueue.kind = 4;
        let action = EnqueueDelayedAction::new(MockProvider, enqueue);
        assert!(action.description().starts_with("Enqueue Unknown(4)"));
    }

    #[tokio::test]
    async fn test_is_ready_zero_inbox() {
        let action = SendL2MessageAction::new(
            MockProvider,
            SendL2Message {
                inbox: Address::ZERO,
                data: Bytes::from_static(&[1, 2, 3]),
                tx_hash: None,
            },
        );
        assert!(!action.is_ready().await.unwrap());
        assert!(!action.is_completed().await.unwrap());
    }

    #[test]
    fn test_send_description() {
        let action = SendL2MessageAction::new(
            MockProvider,
            SendL2Message {
                inbox: Address::repeat_byte(0x0a),
                data: Bytes::from_static(&[1, 2, 3]),
                tx_hash: None,
            },
        );
        assert!(action.description().starts_with("Send 3 byte L2 message"));
        assert_eq!(action.tx_hash(), None);
    }
}
