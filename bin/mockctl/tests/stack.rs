//! Tests against a local anvil chain with compiled mocks.
//!
//! Run with `cargo test -p mockctl -- --ignored` after `anvil` and `forge build`.

use crate::setup::{load_test_config, setup_signer, setup_wallet_provider};
use action::{
    delayed::{SendL2Message, SendL2MessageAction},
    simple::{Increment, IncrementAction, IncrementMode},
    Action,
};
use alloy_primitives::{Bytes, U256};
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::{
    bridge::{BridgeStub, SequencerInboxStub},
    MockContract,
};
use inbox::L1MessageType;
use mockctl::{deploy_mock, deploy_stack, metrics::Metrics, verify_delayed_messages};

#[path = "setup.rs"]
mod setup;

#[tokio::test]
#[ignore = "requires a local anvil chain and compiled mocks"]
async fn test_deploy_stack_wires_bridge() {
    let config = load_test_config();
    let provider = setup_wallet_provider(&config.rpc_url).await;
    let sequencer = setup_signer().address();
    let metrics = Metrics::new();

    let mocks = deploy_stack(provider.clone(), &config, sequencer, &metrics)
        .await
        .expect("Failed to deploy stack");

    let bridge = BridgeStub::new(mocks.bridge().unwrap(), &provider);
    let sequencer_inbox = mocks.sequencer_inbox().unwrap();
    let inbox = mocks.inbox().unwrap();

    assert_eq!(bridge.sequencerInbox().call().await.unwrap(), sequencer_inbox);
    assert!(bridge.allowedDelayedInboxes(inbox).call().await.unwrap());
    assert!(bridge
        .allowedDelayedInboxes(sequencer_inbox)
        .call()
        .await
        .unwrap());

    let seq = SequencerInboxStub::new(sequencer_inbox, &provider);
    assert!(seq.isBatchPoster(sequencer).call().await.unwrap());

    // The init message is delayed message 0
    assert_eq!(
        bridge.delayedMessageCount().call().await.unwrap(),
        U256::from(1)
    );
}

#[tokio::test]
#[ignore = "requires a local anvil chain and compiled mocks"]
async fn test_send_l2_message_and_verify_accumulator() {
    let mut config = load_test_config();
    let provider = setup_wallet_provider(&config.rpc_url).await;
    let metrics = Metrics::new();

    let mocks = deploy_stack(provider.clone(), &config, setup_signer().address(), &metrics)
        .await
        .expect("Failed to deploy stack");
    config.mocks = mocks;

    let mut action = SendL2MessageAction::new(
        provider.clone(),
        SendL2Message {
            inbox: config.mocks.inbox().unwrap(),
            data: Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
            tx_hash: None,
        },
    );
    assert!(action.is_ready().await.unwrap());

    let result = action.execute().await.expect("Failed to send L2 message");
    assert!(result.block_number.is_some());
    assert!(action.is_completed().await.unwrap());

    let (messages, acc) = verify_delayed_messages(
        provider.clone(),
        &config,
        BlockNumberOrTag::Earliest,
        BlockNumberOrTag::Latest,
        &metrics,
    )
    .await
    .expect("Delayed messages do not match the bridge");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message.kind, L1MessageType::Initialize.as_u8());
    assert_eq!(messages[1].message.kind, L1MessageType::L2Message.as_u8());

    let bridge = BridgeStub::new(config.mocks.bridge().unwrap(), &provider);
    let stored = bridge.delayedInboxAccs(U256::from(1)).call().await.unwrap();
    assert_eq!(acc, Some(stored));
}

#[tokio::test]
#[ignore = "requires a local anvil chain and compiled mocks"]
async fn test_deploy_simple_and_increment() {
    let config = load_test_config();
    let provider = setup_wallet_provider(&config.rpc_url).await;
    let metrics = Metrics::new();

    let simple = deploy_mock(
        provider.clone(),
        &config,
        MockContract::Simple,
        Bytes::new(),
        &metrics,
    )
    .await
    .expect("Failed to deploy Simple");

    let mut action = IncrementAction::new(
        provider,
        Increment {
            simple,
            target: 1,
            mode: IncrementMode::Logged,
        },
    );
    assert_eq!(action.counter().await.unwrap(), 0);
    assert!(action.is_ready().await.unwrap());

    action.execute().await.expect("Failed to increment");

    assert_eq!(action.counter().await.unwrap(), 1);
    assert!(action.is_completed().await.unwrap());
    assert!(!action.is_ready().await.unwrap());
}
