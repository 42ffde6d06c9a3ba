pub mod config;
pub mod metrics;

use crate::{config::Config, metrics::Metrics};
use action::{
    deploy::{sequencer_inbox_args, Deploy, DeployAction},
    Action,
};
use alloy_network::Ethereum;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter, Log};
use binding::{
    bridge::{BridgeStub, InboxStub, SequencerInboxStub},
    Artifact, MockContract, MockEvent,
};
use ::config::MockAddresses;
use client::scan::{chunks, scan_with_retry, DEFAULT_CHUNK_SIZE};
use inbox::{DeliveredMessage, InboxStateProvider};
use std::{
    future::Future,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Check, then execute an action unless it is already done or this is a dry run.
///
/// Returns `None` when nothing was sent.
pub async fn run_action<A: Action>(
    action: &mut A,
    name: &str,
    dry_run: bool,
    metrics: &Metrics,
) -> eyre::Result<Option<action::Result>> {
    let description = action.description();

    if action.is_completed().await? {
        info!(action = name, "Already completed: {}", description);
        return Ok(None);
    }

    if !action.is_ready().await? {
        eyre::bail!("Action not ready: {}", description);
    }

    if dry_run {
        info!(action = name, "DRY-RUN: would execute: {}", description);
        return Ok(None);
    }

    let started = Instant::now();
    match action.execute().await {
        Ok(result) => {
            metrics.record_action(name, true, started.elapsed());
            if let Some(gas) = result.gas_used {
                metrics.record_gas_used(gas.saturating_to::<u64>());
            }
            info!(
                action = name,
                tx_hash = %result.tx_hash,
                block_number = result.block_number,
                "{}",
                description
            );
            Ok(Some(result))
        }
        Err(e) => {
            metrics.record_action(name, false, started.elapsed());
            Err(e)
        }
    }
}

/// Deploy one catalogue contract from its artifact.
pub async fn deploy_mock<P>(
    provider: P,
    config: &Config,
    contract: MockContract,
    constructor_args: Bytes,
    metrics: &Metrics,
) -> eyre::Result<Address>
where
    P: Provider + Clone,
{
    let artifact = Artifact::load_mock(&config.artifacts_dir, contract)?;
    let mut action = DeployAction::new(
        provider,
        Deploy {
            contract,
            artifact,
            constructor_args,
            address: None,
        },
    );

    let started = Instant::now();
    let deployment = match action.deploy().await {
        Ok(deployment) => deployment,
        Err(e) => {
            metrics.record_action("deploy", false, started.elapsed());
            return Err(e);
        }
    };

    metrics.record_action("deploy", true, started.elapsed());
    metrics.record_deployment(contract.name());
    if let Some(gas) = deployment.result.gas_used {
        metrics.record_gas_used(gas.saturating_to::<u64>());
    }

    Ok(deployment.address)
}

/// Deploy a bridge, sequencer inbox and inbox and wire them together.
///
/// The sequencer inbox is registered on the bridge, both inboxes are allowed
/// to enqueue delayed messages, and the chain init message is enqueued as
/// delayed message 0.
pub async fn deploy_stack<P>(
    provider: P,
    config: &Config,
    sequencer: Address,
    metrics: &Metrics,
) -> eyre::Result<MockAddresses>
where
    P: Provider + Clone,
{
    let chain_id = config.network_config().l2.chain_id;
    let stack = &config.stack;

    info!(sequencer = %sequencer, chain_id, "Deploying bridge stack");

    let bridge = deploy_mock(
        provider.clone(),
        config,
        MockContract::BridgeStub,
        Bytes::new(),
        metrics,
    )
    .await?;

    let sequencer_inbox = deploy_mock(
        provider.clone(),
        config,
        MockContract::SequencerInboxStub,
        sequencer_inbox_args(
            bridge,
            sequencer,
            stack.max_time_variation(),
            U256::from(stack.max_data_size),
        ),
        metrics,
    )
    .await?;

    let inbox = deploy_mock(
        provider.clone(),
        config,
        MockContract::InboxStub,
        Bytes::new(),
        metrics,
    )
    .await?;

    let bridge_contract = BridgeStub::new(bridge, &provider);
    confirm(
        bridge_contract.setSequencerInbox(sequencer_inbox).send().await?,
        "setSequencerInbox",
    )
    .await?;
    confirm(
        bridge_contract
            .setDelayedInbox(sequencer_inbox, true)
            .send()
            .await?,
        "setDelayedInbox(sequencerInbox)",
    )
    .await?;
    confirm(
        bridge_contract.setDelayedInbox(inbox, true).send().await?,
        "setDelayedInbox(inbox)",
    )
    .await?;

    let inbox_contract = InboxStub::new(inbox, &provider);
    confirm(
        inbox_contract
            .initialize(bridge, sequencer_inbox)
            .send()
            .await?,
        "initialize",
    )
    .await?;

    let sequencer_inbox_contract = SequencerInboxStub::new(sequencer_inbox, &provider);
    confirm(
        sequencer_inbox_contract
            .addInitMessage(U256::from(chain_id))
            .send()
            .await?,
        "addInitMessage",
    )
    .await?;

    info!(
        bridge = %bridge,
        sequencer_inbox = %sequencer_inbox,
        inbox = %inbox,
        "Bridge stack deployed."
    );

    Ok(MockAddresses {
        bridge: Some(bridge),
        inbox: Some(inbox),
        sequencer_inbox: Some(sequencer_inbox),
        ..Default::default()
    })
}

async fn confirm(pending: PendingTransactionBuilder<Ethereum>, step: &str) -> eyre::Result<B256> {
    let receipt = pending.get_receipt().await?;
    if !receipt.status() {
        eyre::bail!("{} reverted in {}", step, receipt.transaction_hash);
    }

    debug!(step, tx_hash = %receipt.transaction_hash, "Wiring step confirmed");
    Ok(receipt.transaction_hash)
}

/// Scan and verify the delayed messages of the configured bridge.
pub async fn verify_delayed_messages<P>(
    provider: P,
    config: &Config,
    from_block: BlockNumberOrTag,
    to_block: BlockNumberOrTag,
    metrics: &Metrics,
) -> eyre::Result<(Vec<DeliveredMessage>, Option<B256>)>
where
    P: Provider + Clone,
{
    let state = InboxStateProvider::new(provider, config.mocks.bridge()?)
        .with_chunk_size(config.scan_chunk_size);

    let messages = state.get_delayed_messages(from_block, to_block).await?;
    metrics.set_delayed_messages(messages.len());

    let acc = state.verify_delayed_messages(&messages).await?;
    Ok((messages, acc))
}

/// Poll `address` for new logs and print every mock event until interrupted.
pub async fn watch<P>(
    provider: P,
    address: Address,
    config: &Config,
    metrics: &Metrics,
) -> eyre::Result<()>
where
    P: Provider + Clone,
{
    let chunk_size = match config.scan_chunk_size {
        0 => DEFAULT_CHUNK_SIZE,
        size => size,
    };
    let mut next_block = provider.get_block_number().await?;
    let mut interval = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));

    info!(address = %address, from = next_block, "Watching for mock events");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(());
            }
            _ = interval.tick() => {}
        }

        let latest = match provider.get_block_number().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!(error = %e, "Failed to fetch block number");
                continue;
            }
        };
        if latest < next_block {
            continue;
        }

        let rpc = &provider;
        next_block = scan_new_logs(next_block, latest, chunk_size, metrics, move |start, end| {
            async move { scan_with_retry(start, end, || fetch_logs(rpc, address, start, end)).await }
        })
        .await;
    }
}

/// Report the logs of `[from, to]` chunk by chunk.
///
/// Returns the next block to scan. A chunk that still fails after its retries
/// stops the pass and is scanned again on the next poll.
async fn scan_new_logs<F, Fut>(
    from: u64,
    to: u64,
    chunk_size: u64,
    metrics: &Metrics,
    scan: F,
) -> u64
where
    F: Fn(u64, u64) -> Fut,
    Fut: Future<Output = eyre::Result<Vec<Log>>>,
{
    for (start, end) in chunks(from, to, chunk_size) {
        match scan(start, end).await {
            Ok(logs) => {
                for log in &logs {
                    report_log(log, metrics);
                }
                metrics.set_last_scanned_block(end);
            }
            Err(e) => {
                warn!(from = start, to = end, error = %e, "Failed to fetch logs, retrying next poll");
                return start;
            }
        }
    }

    to + 1
}

async fn fetch_logs<P: Provider>(
    provider: &P,
    address: Address,
    from: u64,
    to: u64,
) -> eyre::Result<Vec<Log>> {
    let filter = Filter::new().address(address).from_block(from).to_block(to);
    Ok(provider.get_logs(&filter).await?)
}

fn report_log(log: &Log, metrics: &Metrics) {
    match MockEvent::parse(&log.inner) {
        Ok(Some(event)) => {
            metrics.record_event(event.name());
            info!(
                block = log.block_number,
                tx_hash = ?log.transaction_hash,
                event = event.name(),
                "{:?}",
                event
            );
        }
        Ok(None) => {
            metrics.record_unknown_log();
            debug!(block = log.block_number, "Log is not a mock event");
        }
        Err(e) => {
            metrics.record_unknown_log();
            warn!(block = log.block_number, error = %e, "Failed to decode mock event");
        }
    }
}

/// Configured address of a catalogue contract.
pub const fn mock_address(mocks: &MockAddresses, contract: MockContract) -> Option<Address> {
    match contract {
        MockContract::BridgeStub | MockContract::BridgeUnproxied => mocks.bridge,
        MockContract::InboxStub => mocks.inbox,
        MockContract::SequencerInboxStub => mocks.sequencer_inbox,
        MockContract::Simple => mocks.simple,
        MockContract::SingleExecutionChallenge | MockContract::TimedOutChallengeManager => {
            mocks.challenge_manager
        }
        MockContract::MockResultReceiver => mocks.result_receiver,
        MockContract::UpgradeExecutorMock => mocks.upgrade_executor,
        MockContract::ProxyAdminForBinding => mocks.proxy_admin,
        MockContract::SimpleProxy
        | MockContract::PendingBlkTimeAndNrAdvanceCheck
        | MockContract::Benchmarks => None,
    }
}

/// Render addresses as a `[mocks]` table to paste into the config file.
pub fn render_mocks_table(mocks: &MockAddresses) -> String {
    let entries = [
        ("bridge", mocks.bridge),
        ("inbox", mocks.inbox),
        ("sequencer_inbox", mocks.sequencer_inbox),
        ("simple", mocks.simple),
        ("challenge_manager", mocks.challenge_manager),
        ("result_receiver", mocks.result_receiver),
        ("upgrade_executor", mocks.upgrade_executor),
        ("proxy_admin", mocks.proxy_admin),
    ];

    let mut table = String::from("[mocks]\n");
    for (name, address) in entries {
        if let Some(address) = address {
            table.push_str(&format!("{name} = \"{address}\"\n"));
        }
    }
    table
}

/// Parse a block argument: `latest`, `earliest`, a decimal or a 0x-prefixed number.
pub fn parse_block(value: &str) -> Result<BlockNumberOrTag, String> {
    match value {
        "latest" => Ok(BlockNumberOrTag::Latest),
        "earliest" => Ok(BlockNumberOrTag::Earliest),
        hex if hex.starts_with("0x") => u64::from_str_radix(&hex[2..], 16)
            .map(BlockNumberOrTag::Number)
            .map_err(|e| format!("invalid block number {hex}: {e}")),
        decimal => decimal
            .parse()
            .map(BlockNumberOrTag::Number)
            .map_err(|e| format!("invalid block number {decimal}: {e}")),
    }
}

/// Parse 0x-prefixed hex data.
pub fn parse_hex_data(value: &str) -> Result<Bytes, String> {
    value
        .parse::<Bytes>()
        .map_err(|e| format!("invalid hex data: {e}"))
}
