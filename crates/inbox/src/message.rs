use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use binding::bridge::BridgeStub::MessageDelivered;
use std::fmt;

/// Length of the packed delayed message hash preimage.
const MESSAGE_HASH_PREIMAGE_LEN: usize = 1 + 20 + 8 + 8 + 32 + 32 + 32;

/// Kind byte of a delayed inbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum L1MessageType {
    L2Message = 3,
    EndOfBlock = 6,
    L2FundedByL1 = 7,
    RollupEvent = 8,
    SubmitRetryable = 9,
    BatchForGasEstimation = 10,
    Initialize = 11,
    EthDeposit = 12,
    BatchPostingReport = 13,
    Invalid = 0xFF,
}

impl L1MessageType {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for L1MessageType {
    type Error = u8;

    fn try_from(kind: u8) -> Result<Self, Self::Error> {
        Ok(match kind {
            3 => Self::L2Message,
            6 => Self::EndOfBlock,
            7 => Self::L2FundedByL1,
            8 => Self::RollupEvent,
            9 => Self::SubmitRetryable,
            10 => Self::BatchForGasEstimation,
            11 => Self::Initialize,
            12 => Self::EthDeposit,
            13 => Self::BatchPostingReport,
            0xFF => Self::Invalid,
            other => return Err(other),
        })
    }
}

impl fmt::Display for L1MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.as_u8())
    }
}

/// Everything the bridge hashes when a message enters the delayed inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedMessage {
    pub kind: u8,
    pub sender: Address,
    /// L1 block the message was enqueued in
    pub block_number: u64,
    pub timestamp: u64,
    /// Position in the delayed inbox
    pub inbox_seq_num: U256,
    pub base_fee_l1: U256,
    pub message_data_hash: B256,
}

impl DelayedMessage {
    /// Rebuild a message from its `MessageDelivered` event.
    ///
    /// The event does not carry the L1 block number, it comes from the log.
    pub fn from_event(event: &MessageDelivered, block_number: u64) -> Self {
        Self {
            kind: event.kind,
            sender: event.sender,
            block_number,
            timestamp: event.timestamp,
            inbox_seq_num: event.messageIndex,
            base_fee_l1: event.baseFeeL1,
            message_data_hash: event.messageDataHash,
        }
    }

    /// Message hash folded into the delayed accumulator.
    pub fn hash(&self) -> B256 {
        // keccak256(abi.encodePacked(kind, sender, blockNumber, timestamp,
        // inboxSeqNum, baseFeeL1, messageDataHash))
        let mut packed = Vec::with_capacity(MESSAGE_HASH_PREIMAGE_LEN);
        packed.push(self.kind);
        packed.extend_from_slice(self.sender.as_slice());
        packed.extend_from_slice(&self.block_number.to_be_bytes());
        packed.extend_from_slice(&self.timestamp.to_be_bytes());
        packed.extend_from_slice(&self.inbox_seq_num.to_be_bytes::<32>());
        packed.extend_from_slice(&self.base_fee_l1.to_be_bytes::<32>());
        packed.extend_from_slice(self.message_data_hash.as_slice());

        keccak256(packed)
    }

    pub fn message_type(&self) -> Option<L1MessageType> {
        L1MessageType::try_from(self.kind).ok()
    }
}

/// Body of the chain initialization message enqueued by `SequencerInboxStub.addInitMessage`.
pub fn init_message_data(chain_id: U256) -> Bytes {
    chain_id.to_be_bytes::<32>().to_vec().into()
}

/// Data hash the inbox stub passes to the bridge for an L2 message.
pub fn l2_message_data_hash(message: &[u8]) -> B256 {
    keccak256(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> DelayedMessage {
        DelayedMessage {
            kind: L1MessageType::L2Message.as_u8(),
            sender: Address::repeat_byte(0x11),
            block_number: 100,
            timestamp: 1_700_000_000,
            inbox_seq_num: U256::from(4),
            base_fee_l1: U256::from(7),
            message_data_hash: B256::repeat_byte(0x22),
        }
    }

    #[test]
    fn test_message_type_conversion() {
        assert_eq!(L1MessageType::try_from(11), Ok(L1MessageType::Initialize));
        assert_eq!(L1MessageType::try_from(0xFF), Ok(L1MessageType::Invalid));
        assert_eq!(L1MessageType::try_from(4), Err(4));
        assert_eq!(L1MessageType::EthDeposit.to_string(), "EthDeposit(12)");
    }

    #[test]
    fn test_message_hash_layout() {
        let message = sample_message();

        let mut packed = Vec::new();
        packed.push(3u8);
        packed.extend_from_slice(&[0x11; 20]);
        packed.extend_from_slice(&100u64.to_be_bytes());
        packed.extend_from_slice(&1_700_000_000u64.to_be_bytes());
        packed.extend_from_slice(&U256::from(4).to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(7).to_be_bytes::<32>());
        packed.extend_from_slice(&[0x22; 32]);
        assert_eq!(packed.len(), 133);
        assert_eq!(MESSAGE_HASH_PREIMAGE_LEN, 133);

        assert_eq!(message.hash(), keccak256(&packed));
    }

    #[test]
    fn test_message_hash_depends_on_block() {
        let message = sample_message();
        let mut later = message.clone();
        later.block_number += 1;
        assert_ne!(message.hash(), later.hash());
    }

    #[test]
    fn test_from_event() {
        let event = MessageDelivered {
            messageIndex: U256::from(4),
            beforeInboxAcc: B256::ZERO,
            inbox: Address::repeat_byte(0x99),
            kind: 3,
            sender: Address::repeat_byte(0x11),
            messageDataHash: B256::repeat_byte(0x22),
            baseFeeL1: U256::from(7),
            timestamp: 1_700_000_000,
        };

        let message = DelayedMessage::from_event(&event, 100);
        assert_eq!(message, sample_message());
        assert_eq!(message.message_type(), Some(L1MessageType::L2Message));
    }

    #[test]
    fn test_init_message_data() {
        let data = init_message_data(U256::from(412346));
        assert_eq!(data.len(), 32);
        assert_eq!(&data[29..], &[0x06, 0x4a, 0xba]);
    }
}
