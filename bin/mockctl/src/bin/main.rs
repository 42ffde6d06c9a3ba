//! CLI to deploy and drive the bridge and challenge mocks on a dev chain.
//!
//! Read-only commands (`list`, `abi`, `verify`, `delayed-messages`, `batches`,
//! `watch`, `challenge-status`, `challenges`) work without a private key.

use action::{
    batch::{PostBatch, PostBatchAction},
    challenge::{CreateChallenge, CreateChallengeAction},
    delayed::{EnqueueDelayed, EnqueueDelayedAction, SendL2Message, SendL2MessageAction},
    simple::{Increment, IncrementAction, IncrementMode},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::{bridge::SequencerInboxStub, simple::Simple, Artifact, MockContract};
use challenge::{latest_by_challenge, ChallengeStateProvider, ChallengeStatus, GlobalStateView};
use clap::{Parser, Subcommand, ValueEnum};
use inbox::{verify_batch_chain, InboxStateProvider};
use mockctl::{
    config::Config,
    deploy_mock, deploy_stack, mock_address,
    metrics::{install_prometheus_exporter, Metrics},
    parse_block, parse_hex_data, render_mocks_table, run_action, verify_delayed_messages, watch,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "mockctl")]
#[command(about = "Deploy and drive rollup bridge mocks on a dev chain")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    /// Dry-run mode: log actions without executing transactions
    #[arg(long)]
    dry_run: bool,

    /// Serve Prometheus metrics on this port
    #[arg(long)]
    metrics_port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the mock catalogue and whether artifacts are present
    List,

    /// Print the ABI of a mock as JSON
    Abi { contract: String },

    /// Check a compiled artifact against the built-in interface
    Verify { contract: String },

    /// Deploy a single mock
    Deploy {
        contract: String,
        /// ABI-encoded constructor arguments
        #[arg(long, value_parser = parse_hex_data, default_value = "0x")]
        args: Bytes,
    },

    /// Deploy and wire bridge, sequencer inbox and inbox
    DeployStack,

    /// Send an L2 message through the inbox
    SendL2Message {
        #[arg(value_parser = parse_hex_data)]
        data: Bytes,
    },

    /// Enqueue a delayed message on the bridge directly
    EnqueueDelayed {
        /// L1 message kind
        #[arg(long, default_value_t = 3)]
        kind: u8,
        #[arg(long)]
        sender: Address,
        #[arg(long)]
        data_hash: B256,
    },

    /// Post a calldata batch to the sequencer inbox
    PostBatch {
        #[arg(value_parser = parse_hex_data)]
        data: Bytes,
        /// Delayed messages read after this batch
        #[arg(long)]
        after_delayed: u64,
        #[arg(long)]
        prev_message_count: u64,
        #[arg(long)]
        new_message_count: u64,
    },

    /// Bump the `Simple` counter
    Increment {
        /// Counter value to reach, defaults to one above the current value
        #[arg(long)]
        target: Option<u64>,
        #[arg(long, value_enum, default_value_t = Mode::Plain)]
        mode: Mode,
    },

    /// Scan, list and verify delayed inbox messages
    DelayedMessages {
        #[arg(long, value_parser = parse_block, default_value = "earliest")]
        from: BlockNumberOrTag,
        #[arg(long, value_parser = parse_block, default_value = "latest")]
        to: BlockNumberOrTag,
    },

    /// Scan sequencer batches and check their accumulator chain
    Batches {
        #[arg(long, value_parser = parse_block, default_value = "earliest")]
        from: BlockNumberOrTag,
        #[arg(long, value_parser = parse_block, default_value = "latest")]
        to: BlockNumberOrTag,
    },

    /// Print events of a deployed mock as they arrive
    Watch {
        contract: String,
        /// Address to watch instead of the configured one
        #[arg(long)]
        address: Option<Address>,
    },

    /// Create a challenge through the result receiver
    CreateChallenge {
        #[arg(long)]
        asserter: Address,
        #[arg(long)]
        challenger: Address,
        #[arg(long, default_value_t = 1)]
        num_blocks: u64,
        #[arg(long, default_value = "0x0000000000000000000000000000000000000000000000000000000000000000")]
        wasm_module_root: B256,
        /// Seconds each participant starts with
        #[arg(long, default_value_t = 3_600)]
        time_left: u64,
    },

    /// Show the state of a challenge
    ChallengeStatus { index: u64 },

    /// List challenge lifecycle events and completions
    Challenges {
        #[arg(long, value_parser = parse_block, default_value = "earliest")]
        from: BlockNumberOrTag,
        #[arg(long, value_parser = parse_block, default_value = "latest")]
        to: BlockNumberOrTag,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Plain,
    Emit,
    Logged,
}

impl From<Mode> for IncrementMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Plain => Self::Plain,
            Mode::Emit => Self::Emit,
            Mode::Logged => Self::Logged,
        }
    }
}

fn parse_contract(name: &str) -> eyre::Result<MockContract> {
    MockContract::from_name(name).ok_or_else(|| eyre::eyre!("Unknown mock contract {}", name))
}

fn require_key(cli: &Cli) -> eyre::Result<&str> {
    cli.private_key
        .as_deref()
        .ok_or_else(|| eyre::eyre!("This command needs a private key (--private-key or PRIVATE_KEY)"))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_file(&cli.config)?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.dry_run = true;
    }

    if let Some(port) = cli.metrics_port {
        install_prometheus_exporter(port)?;
    }
    let metrics = Metrics::new();

    info!("Loaded config:");
    info!("  Network: {:?}", config.network);
    info!("  RPC URL: {}", config.rpc_url);
    info!("  Artifacts: {}", config.artifacts_dir.display());
    if config.dry_run {
        info!("  Mode: DRY-RUN (no transactions will be executed)");
    }

    match &cli.command {
        Command::List => {
            for contract in MockContract::all() {
                let present = contract.artifact_path(&config.artifacts_dir).exists();
                let deployed = mock_address(&config.mocks, *contract)
                    .map(|address| address.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<34} artifact: {:<5} address: {}",
                    contract.name(),
                    present,
                    deployed
                );
            }
        }
        Command::Abi { contract } => {
            let contract = parse_contract(contract)?;
            println!("{}", serde_json::to_string_pretty(&contract.abi())?);
        }
        Command::Verify { contract } => {
            let contract = parse_contract(contract)?;
            let artifact = Artifact::load_mock(&config.artifacts_dir, contract)?;
            artifact.verify_against(contract)?;
            info!(contract = contract.name(), "Artifact matches interface");
        }
        Command::Deploy { contract, args } => {
            let contract = parse_contract(contract)?;
            if config.dry_run {
                info!(contract = contract.name(), "DRY-RUN: would deploy");
                return Ok(());
            }

            let provider = client::create_wallet_provider(&config.rpc_url, require_key(&cli)?)?;
            let address = deploy_mock(provider, &config, contract, args.clone(), &metrics).await?;
            info!(contract = contract.name(), address = %address, "Deployed");
        }
        Command::DeployStack => {
            let key = require_key(&cli)?;
            let sequencer = client::signer_address(key)?;
            if config.dry_run {
                info!(sequencer = %sequencer, "DRY-RUN: would deploy bridge stack");
                return Ok(());
            }

            let provider = client::create_wallet_provider(&config.rpc_url, key)?;
            client::ensure_chain_id(&provider, config.network_config().l1.chain_id).await?;

            let deployed = deploy_stack(provider, &config, sequencer, &metrics).await?;
            println!("{}", render_mocks_table(&deployed.merge(config.mocks.clone())));
        }
        Command::SendL2Message { data } => {
            let provider = client::create_wallet_provider(&config.rpc_url, require_key(&cli)?)?;
            let mut action = SendL2MessageAction::new(
                provider,
                SendL2Message {
                    inbox: config.mocks.inbox()?,
                    data: data.clone(),
                    tx_hash: None,
                },
            );
            run_action(&mut action, "send_l2_message", config.dry_run, &metrics).await?;
        }
        Command::EnqueueDelayed {
            kind,
            sender,
            data_hash,
        } => {
            let key = require_key(&cli)?;
            let provider = client::create_wallet_provider(&config.rpc_url, key)?;
            let mut action = EnqueueDelayedAction::new(
                provider,
                EnqueueDelayed {
                    bridge: config.mocks.bridge()?,
                    kind: *kind,
                    sender: *sender,
                    message_data_hash: *data_hash,
                    from: client::signer_address(key)?,
                    tx_hash: None,
                },
            );
            run_action(&mut action, "enqueue_delayed", config.dry_run, &metrics).await?;
        }
        Command::PostBatch {
            data,
            after_delayed,
            prev_message_count,
            new_message_count,
        } => {
            let key = require_key(&cli)?;
            let provider = client::create_wallet_provider(&config.rpc_url, key)?;
            let sequencer_inbox = config.mocks.sequencer_inbox()?;

            let sequence_number = SequencerInboxStub::new(sequencer_inbox, &provider)
                .batchCount()
                .call()
                .await?;

            let mut action = PostBatchAction::new(
                provider,
                PostBatch {
                    sequencer_inbox,
                    sequence_number,
                    data: data.clone(),
                    after_delayed_messages_read: U256::from(*after_delayed),
                    gas_refunder: Address::ZERO,
                    prev_message_count: *prev_message_count,
                    new_message_count: *new_message_count,
                    from: client::signer_address(key)?,
                },
            );
            run_action(&mut action, "post_batch", config.dry_run, &metrics).await?;
        }
        Command::Increment { target, mode } => {
            let provider = client::create_wallet_provider(&config.rpc_url, require_key(&cli)?)?;
            let simple = config.mocks.simple()?;

            let target = match target {
                Some(target) => *target,
                None => Simple::new(simple, &provider).counter().call().await? + 1,
            };

            let mut action = IncrementAction::new(
                provider,
                Increment {
                    simple,
                    target,
                    mode: (*mode).into(),
                },
            );
            run_action(&mut action, "increment", config.dry_run, &metrics).await?;
            info!(counter = action.counter().await?, "Counter");
        }
        Command::DelayedMessages { from, to } => {
            let provider = client::create_provider(&config.rpc_url).await?;
            let (messages, acc) =
                verify_delayed_messages(provider, &config, *from, *to, &metrics).await?;

            for delivered in &messages {
                let message = &delivered.message;
                println!(
                    "#{} kind={} sender={} block={} data_hash={}",
                    message.inbox_seq_num,
                    message.kind,
                    message.sender,
                    message.block_number,
                    message.message_data_hash
                );
            }

            match acc {
                Some(acc) => info!(count = messages.len(), acc = %acc, "Delayed messages verified"),
                None => info!("No delayed messages in range"),
            }
        }
        Command::Batches { from, to } => {
            let provider = client::create_provider(&config.rpc_url).await?;
            let state = InboxStateProvider::new(provider, config.mocks.bridge()?)
                .with_sequencer_inbox(config.mocks.sequencer_inbox()?)
                .with_chunk_size(config.scan_chunk_size);

            let batches = state.get_sequencer_batches(*from, *to).await?;
            for batch in &batches {
                println!(
                    "#{} block={} delayed_read={} after_acc={}",
                    batch.sequence_number,
                    batch.l1_block,
                    batch.after_delayed_messages_read,
                    batch.after_acc
                );
            }

            verify_batch_chain(&batches, |_| None)?;
            info!(count = batches.len(), "Batch chain verified");
        }
        Command::Watch { contract, address } => {
            let contract = parse_contract(contract)?;
            let address = address
                .or_else(|| mock_address(&config.mocks, contract))
                .ok_or_else(|| eyre::eyre!("No address configured for {}", contract.name()))?;

            let provider = client::create_provider(&config.rpc_url).await?;
            watch(provider, address, &config, &metrics).await?;
        }
        Command::CreateChallenge {
            asserter,
            challenger,
            num_blocks,
            wasm_module_root,
            time_left,
        } => {
            let provider = client::create_wallet_provider(&config.rpc_url, require_key(&cli)?)?;
            let mut action = CreateChallengeAction::new(
                provider,
                CreateChallenge {
                    result_receiver: config.mocks.result_receiver()?,
                    wasm_module_root: *wasm_module_root,
                    start: GlobalStateView::default(),
                    end: GlobalStateView::new(B256::ZERO, B256::ZERO, *num_blocks, 0),
                    num_blocks: *num_blocks,
                    asserter: *asserter,
                    challenger: *challenger,
                    asserter_time_left: U256::from(*time_left),
                    challenger_time_left: U256::from(*time_left),
                    tx_hash: None,
                },
            );
            run_action(&mut action, "create_challenge", config.dry_run, &metrics).await?;
        }
        Command::ChallengeStatus { index } => {
            let provider = client::create_provider(&config.rpc_url).await?;
            let state = ChallengeStateProvider::new(provider, config.mocks.challenge_manager()?)
                .with_chunk_size(config.scan_chunk_size);

            match state.status(*index).await? {
                ChallengeStatus::NoChallenge => info!(index, "No challenge"),
                ChallengeStatus::Active {
                    responder,
                    time_left,
                    mode,
                } => info!(
                    index,
                    responder = %responder,
                    time_left = %time_left,
                    mode = ?mode,
                    "Challenge active"
                ),
                ChallengeStatus::TimedOut { responder } => {
                    info!(index, responder = %responder, "Challenge timed out")
                }
            }
        }
        Command::Challenges { from, to } => {
            let provider = client::create_provider(&config.rpc_url).await?;
            let state = ChallengeStateProvider::new(provider, config.mocks.challenge_manager()?)
                .with_chunk_size(config.scan_chunk_size);

            let total = state.total_challenges().await?;
            let events = state.challenge_events(*from, *to).await?;
            for (index, event) in latest_by_challenge(&events) {
                println!("#{} block={} {:?}", index, event.block(), event);
            }

            if let Some(receiver) = config.mocks.result_receiver {
                for completion in state.completions(receiver, *from, *to).await? {
                    println!(
                        "#{} completed block={} winner={} loser={}",
                        completion.challenge_index,
                        completion.block,
                        completion.winner,
                        completion.loser
                    );
                }
            }

            info!(total, events = events.len(), "Challenges listed");
        }
    }

    Ok(())
}
