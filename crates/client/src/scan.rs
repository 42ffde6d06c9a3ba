//! Helpers for scanning logs over large block ranges.
//!
//! RPC providers cap the block range of `eth_getLogs` and nodes behind a load
//! balancer can briefly disagree on the head. Scanners resolve both ends of a
//! range up front, split it into fixed chunks and retry each chunk.

use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use std::{future::Future, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::warn;

/// Default chunk size, 500 blocks below the common 10,000 block limit.
pub const DEFAULT_CHUNK_SIZE: u64 = 9_500;

/// Resolve a block tag to a concrete number.
pub async fn resolve_block_number<P>(provider: &P, block: BlockNumberOrTag) -> eyre::Result<u64>
where
    P: Provider,
{
    match block {
        BlockNumberOrTag::Number(n) => Ok(n),
        BlockNumberOrTag::Earliest => Ok(0),
        BlockNumberOrTag::Latest => Ok(provider.get_block_number().await?),
        _ => Err(eyre::eyre!("Unsupported block tag: {:?}", block)),
    }
}

/// Resolve both ends of an inclusive range, failing when `from > to`.
pub async fn resolve_block_range<P>(
    provider: &P,
    from_block: BlockNumberOrTag,
    to_block: BlockNumberOrTag,
) -> eyre::Result<(u64, u64)>
where
    P: Provider,
{
    let from = resolve_block_number(provider, from_block).await?;
    let to = resolve_block_number(provider, to_block).await?;

    if from > to {
        eyre::bail!("from_block ({}) must be <= to_block ({})", from, to);
    }

    Ok((from, to))
}

/// Split an inclusive block range into inclusive chunks of at most `size` blocks.
pub fn chunks(from: u64, to: u64, size: u64) -> Vec<(u64, u64)> {
    let size = size.max(1);
    let mut ranges = Vec::new();
    let mut current = from;

    while current <= to {
        let end = current.saturating_add(size - 1).min(to);
        ranges.push((current, end));
        if end == u64::MAX {
            break;
        }
        current = end + 1;
    }

    ranges
}

/// Backoff between chunk retries: 100ms, 200ms, 400ms, 800ms, 1.6s.
pub fn retry_strategy() -> impl Iterator<Item = Duration> {
    // `from_millis(100)` alone would grow as 100^n.
    ExponentialBackoff::from_millis(2).factor(50).take(5)
}

/// Run `scan` for the chunk `[from, to]` with exponential backoff.
pub async fn scan_with_retry<T, F, Fut>(from: u64, to: u64, scan: F) -> eyre::Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = eyre::Result<T>>,
{
    scan_with_strategy(retry_strategy(), from, to, scan).await
}

async fn scan_with_strategy<T, S, F, Fut>(strategy: S, from: u64, to: u64, scan: F) -> eyre::Result<T>
where
    S: IntoIterator<Item = Duration>,
    F: Fn() -> Fut,
    Fut: Future<Output = eyre::Result<T>>,
{
    Retry::spawn(strategy, || async {
        scan().await.map_err(|e| {
            warn!(from, to, error = %e, "Chunk scan failed, will retry");
            e
        })
    })
    .await
}
