//! Drive the `Simple` counter mock.

use crate::{ensure_success, find_event, Action};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::simple::Simple::{self, CounterEvent, LogAndIncrementCalled};
use tracing::info;

/// How the counter is bumped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IncrementMode {
    /// `increment()`
    #[default]
    Plain,
    /// `incrementEmit()`, emits `CounterEvent`
    Emit,
    /// `logAndIncrement(expected)`, emits `LogAndIncrementCalled`
    Logged,
}

#[derive(Clone, Debug)]
pub struct Increment {
    pub simple: Address,
    /// Counter value after which the action is complete
    pub target: u64,
    pub mode: IncrementMode,
}

pub struct IncrementAction<P> {
    provider: P,
    action: Increment,
}

impl<P> IncrementAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, action: Increment) -> Self {
        Self { provider, action }
    }

    pub async fn counter(&self) -> eyre::Result<u64> {
        let simple = Simple::new(self.action.simple, &self.provider);
        Ok(simple.counter().call().await?)
    }
}

impl<P> Action for IncrementAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.simple == Address::ZERO {
            return Ok(false);
        }

        Ok(self.counter().await? < self.action.target)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        Ok(self.counter().await? >= self.action.target)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        let before = self.counter().await?;
        if before >= self.action.target {
            eyre::bail!("Counter already at {}", before)
        }

        let simple = Simple::new(self.action.simple, &self.provider);
        let call = match self.action.mode {
            IncrementMode::Plain => simple.increment().send().await?,
            IncrementMode::Emit => simple.incrementEmit().send().await?,
            IncrementMode::Logged => simple.logAndIncrement(U256::from(before)).send().await?,
        };
        let receipt = call.get_receipt().await?;
        ensure_success(&receipt)?;

        match self.action.mode {
            IncrementMode::Plain => {}
            IncrementMode::Emit => {
                let event = find_event::<CounterEvent>(&receipt)?;
                if event.count != before + 1 {
                    eyre::bail!("CounterEvent reported {}, expected {}", event.count, before + 1);
                }
            }
            IncrementMode::Logged => {
                let event = find_event::<LogAndIncrementCalled>(&receipt)?;
                if event.expected != event.have {
                    eyre::bail!(
                        "Counter moved concurrently: expected {}, contract had {}",
                        event.expected,
                        event.have
                    );
                }
            }
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            counter = before + 1,
            "Counter incremented."
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Increment counter of {} to {} ({:?})",
            self.action.simple, self.action.target, self.action.mode
        )
    }
}
