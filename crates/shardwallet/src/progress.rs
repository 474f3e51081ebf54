//! Waiting for the store's background reads to finish.

use shardwallet_core::state::{Event, FetchFailure, FetchStage, ShardwalletStore};
use shardwallet_core::types::ShardId;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

/// Completion of the store's reads as observed through its events.
pub struct Progress {
    events: broadcast::Receiver<Event>,
    shard_ids: Option<Vec<ShardId>>,
    balances_for: Option<ShardId>,
    price_loaded: bool,
    failures: Vec<FetchFailure>,
}

impl Progress {
    /// Start listening before anything is loaded so no event is missed.
    pub fn new(store: &ShardwalletStore) -> Self {
        Self {
            events: store.subscribe_events(),
            shard_ids: None,
            balances_for: None,
            price_loaded: false,
            failures: Vec::new(),
        }
    }

    pub fn failure(&self, stage: FetchStage) -> Option<&FetchFailure> {
        self.failures.iter().find(|f| f.stage == stage)
    }

    pub fn directory_settled(&self) -> bool {
        self.shard_ids.is_some() || self.failure(FetchStage::Shards).is_some()
    }

    /// The preview of `shard` finished, or there is nothing to preview.
    pub fn balances_settled(&self, shard: Option<ShardId>) -> bool {
        match shard {
            None => true,
            Some(shard) => {
                self.balances_for == Some(shard) || self.failure(FetchStage::Balances).is_some()
            }
        }
    }

    pub fn price_settled(&self) -> bool {
        self.price_loaded || self.failure(FetchStage::Price).is_some()
    }

    /// Forget the preview outcome before selecting another shard.
    pub fn reset_balances(&mut self) {
        self.balances_for = None;
        self.failures.retain(|f| f.stage != FetchStage::Balances);
    }

    /// Process events until `done` holds.
    pub async fn wait_until(
        &mut self,
        done: impl Fn(&Progress) -> bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !done(self) {
            let event = match self.events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(event = "cli.progress.events_lagged", skipped = skipped);
                    continue;
                }
                Err(RecvError::Closed) => return Err("Store shut down while loading".into()),
            };
            self.apply(event);
        }
        Ok(())
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::ShardsLoaded { shard_ids, .. } => self.shard_ids = Some(shard_ids),
            Event::BalancesLoaded { shard } => self.balances_for = Some(shard),
            Event::PriceLoaded { .. } => self.price_loaded = true,
            Event::FetchFailed(failure) => self.failures.push(failure),
            Event::ClaimSubmitted { .. }
            | Event::ClaimConfirmed { .. }
            | Event::ClaimFailed { .. } => {}
        }
    }
}
