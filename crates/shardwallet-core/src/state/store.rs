use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chain::TxReceipt;
use crate::claims::{BalancesSnapshot, ClaimError, claim_call, confirm_claim, preview_claim, submit_claim};
use crate::config::ShardwalletConfig;
use crate::price::{PriceSnapshot, fetch_price};
use crate::shards::enumerate_shards;
use crate::state::errors::StoreError;
use crate::state::events::Event;
use crate::state::fetch::{FetchSlot, Ticket};
use crate::state::view::{FetchFailure, FetchStage, ShardwalletView};
use crate::types::{Address, CURRENCIES, ClaimFraction, Currency, ShardId};
use crate::wallet::{ProviderHandle, WalletSession, WalletState};

const EVENT_CAPACITY: usize = 64;

/// Reactive coordinator for one wallet session and one shardwallet.
///
/// Reads (shard directory, claim preview, price) run as background tasks
/// and are restarted whenever their inputs change; a superseded read never
/// publishes. The current state is available through [`view`](Self::view)
/// and [`subscribe`](Self::subscribe). An [`Event`] is only sent once the
/// view reflecting it has been published.
///
/// Dropping the store cancels every in-flight read.
pub struct ShardwalletStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    wallet: WalletSession,
    oracle: Address,
    currencies: &'static [Currency],
    state: Mutex<State>,
    view: watch::Sender<ShardwalletView>,
    events: broadcast::Sender<Event>,
    claiming: AtomicBool,
    shutdown: CancellationToken,
}

#[derive(Default)]
struct State {
    wallet: WalletState,
    shardwallet: Option<Address>,
    shard_ids: Vec<ShardId>,
    selected_shard: Option<ShardId>,
    balances: Option<BalancesSnapshot>,
    price: Option<PriceSnapshot>,
    last_error: Option<FetchFailure>,
    directory: FetchSlot,
    preview: FetchSlot,
    price_fetch: FetchSlot,
}

impl State {
    fn connection(&self) -> Option<(Address, ProviderHandle)> {
        Some((self.wallet.account?, self.wallet.provider.clone()?))
    }

    fn clear_failure(&mut self, stage: FetchStage) {
        if self.last_error.as_ref().is_some_and(|f| f.stage == stage) {
            self.last_error = None;
        }
    }
}

impl ShardwalletStore {
    /// Create a store for the configured shardwallet and start loading.
    ///
    /// Spawns background tasks, so it must be called from within a tokio
    /// runtime.
    pub fn new(wallet: WalletSession, config: &ShardwalletConfig) -> Self {
        Self::with_currencies(wallet, config, CURRENCIES)
    }

    pub fn with_currencies(
        wallet: WalletSession,
        config: &ShardwalletConfig,
        currencies: &'static [Currency],
    ) -> Self {
        let (view, _) = watch::channel(ShardwalletView::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shardwallet = config.shardwallet_address();

        let inner = Arc::new(StoreInner {
            wallet: wallet.clone(),
            oracle: config.oracle_address(),
            currencies,
            state: Mutex::new(State {
                shardwallet: Some(shardwallet),
                ..State::default()
            }),
            view,
            events,
            claiming: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });

        let mut wallet_rx = wallet.subscribe();
        let initial = wallet_rx.borrow_and_update().clone();
        inner.apply_wallet(initial);
        tokio::spawn(inner.clone().watch_wallet(wallet_rx));

        info!(
            event = "core.store.create_completed",
            shardwallet = %shardwallet,
            oracle = %inner.oracle
        );

        Self { inner }
    }

    pub fn wallet(&self) -> &WalletSession {
        &self.inner.wallet
    }

    pub fn currencies(&self) -> &'static [Currency] {
        self.inner.currencies
    }

    pub fn view(&self) -> ShardwalletView {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShardwalletView> {
        self.inner.view.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// Switch to another shard collection, or to none.
    ///
    /// Shard ids, selection and balances are cleared before this returns.
    pub fn set_shardwallet(&self, shardwallet: Option<Address>) {
        let mut state = self.inner.lock();
        if state.shardwallet == shardwallet {
            return;
        }
        info!(event = "core.store.shardwallet_changed", shardwallet = ?shardwallet);
        state.shardwallet = shardwallet;
        self.inner.restart_directory(&mut state, None);
        self.inner.publish(&state);
    }

    /// Select one of the owned shards and preview its balances.
    pub fn select_shard(&self, shard: ShardId) -> Result<(), StoreError> {
        let mut state = self.inner.lock();
        if !state.shard_ids.contains(&shard) {
            return Err(StoreError::ShardNotOwned { shard });
        }
        if state.selected_shard == Some(shard) {
            return Ok(());
        }
        debug!(event = "core.store.shard_selected", shard = %shard);
        state.selected_shard = Some(shard);
        self.inner.restart_preview(&mut state);
        self.inner.publish(&state);
        Ok(())
    }

    /// Re-read the shard directory, the preview and the price.
    ///
    /// The current selection is kept if the shard is still owned afterwards.
    pub fn refresh(&self) {
        let mut state = self.inner.lock();
        info!(event = "core.store.refresh_started");
        let keep = state.selected_shard;
        self.inner.restart_price(&mut state);
        self.inner.restart_directory(&mut state, keep);
        self.inner.publish(&state);
    }

    /// Claim `fraction` of every configured currency from the selected shard.
    ///
    /// Only one claim runs at a time. `claiming` is cleared on every exit,
    /// including when the returned future is dropped.
    pub async fn claim(&self, fraction: ClaimFraction) -> Result<TxReceipt, ClaimError> {
        let inner = &self.inner;
        if inner
            .claiming
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClaimError::AlreadyClaiming);
        }
        let _guard = ClaimingGuard { inner };

        let (account, provider, shardwallet, shard) = {
            let state = inner.lock();
            let Some((account, provider)) = state.connection() else {
                return Err(ClaimError::Disconnected);
            };
            let (Some(shardwallet), Some(shard)) = (state.shardwallet, state.selected_shard) else {
                return Err(ClaimError::NoShardSelected);
            };
            inner.publish(&state);
            (account, provider, shardwallet, shard)
        };

        let call = claim_call(shard, inner.currencies, fraction);
        let chain = provider.chain().as_ref();
        let result = async {
            let tx_hash = submit_claim(chain, shardwallet, account, &call).await?;
            inner.emit(Event::ClaimSubmitted { shard, tx_hash });
            confirm_claim(chain, tx_hash).await
        }
        .await;

        match &result {
            Ok(receipt) => {
                inner.emit(Event::ClaimConfirmed {
                    shard,
                    receipt: *receipt,
                });
                inner.refresh_after_claim(account, shardwallet, shard);
            }
            Err(error) => {
                warn!(
                    event = "core.store.claim_failed",
                    shard = %shard,
                    error = %error
                );
                inner.emit(Event::ClaimFailed {
                    shard,
                    error: error.clone(),
                });
            }
        }

        result
    }
}

impl Drop for ShardwalletStore {
    fn drop(&mut self) {
        debug!(event = "core.store.shutdown_started");
        self.inner.shutdown.cancel();
    }
}

struct ClaimingGuard<'a> {
    inner: &'a Arc<StoreInner>,
}

impl Drop for ClaimingGuard<'_> {
    fn drop(&mut self) {
        self.inner.claiming.store(false, Ordering::Release);
        let state = self.inner.lock();
        self.inner.publish(&state);
    }
}

impl StoreInner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        let view = ShardwalletView {
            account: state.wallet.account,
            chain_id: state.wallet.chain_id,
            shardwallet: state.shardwallet,
            shard_ids: state.shard_ids.clone(),
            selected_shard: state.selected_shard,
            balances: state.balances.clone(),
            claiming: self.claiming.load(Ordering::Acquire),
            price: state.price,
            last_error: state.last_error.clone(),
        };
        self.view.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn record_failure(
        &self,
        state: &mut State,
        stage: FetchStage,
        error: &dyn std::error::Error,
    ) -> Event {
        warn!(event = "core.store.fetch_failed", stage = %stage, error = %error);
        let failure = FetchFailure {
            stage,
            message: error.to_string(),
        };
        state.last_error = Some(failure.clone());
        Event::FetchFailed(failure)
    }

    /// A finished read may only publish if the wallet has not moved on, even
    /// when the store has not yet seen the change. A current read that fails
    /// this check is restarted rather than dropped.
    fn wallet_unchanged(&self, account: Option<Address>, provider: &ProviderHandle) -> bool {
        let wallet = self.wallet.state();
        wallet.provider.as_ref() == Some(provider)
            && account.is_none_or(|account| wallet.account == Some(account))
    }

    fn apply_wallet(self: &Arc<Self>, wallet: WalletState) {
        let mut state = self.lock();
        let provider_changed = state.wallet.provider != wallet.provider;
        let account_changed = state.wallet.account != wallet.account;
        state.wallet = wallet;

        if provider_changed {
            self.restart_price(&mut state);
        }
        if provider_changed || account_changed {
            self.restart_directory(&mut state, None);
        }
        self.publish(&state);
    }

    async fn watch_wallet(self: Arc<Self>, mut wallet: watch::Receiver<WalletState>) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                changed = wallet.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = wallet.borrow_and_update().clone();
                    self.apply_wallet(current);
                }
            }
        }
        debug!(event = "core.store.wallet_watch_stopped");
    }

    fn restart_directory(self: &Arc<Self>, state: &mut State, keep: Option<ShardId>) {
        state.shard_ids.clear();
        state.selected_shard = None;
        state.clear_failure(FetchStage::Shards);
        self.restart_preview(state);

        let (Some(shardwallet), Some((account, provider))) =
            (state.shardwallet, state.connection())
        else {
            state.directory.reset();
            return;
        };
        let ticket = state.directory.restart(&self.shutdown);
        tokio::spawn(
            self.clone()
                .run_directory(ticket, provider, shardwallet, account, keep),
        );
    }

    async fn run_directory(
        self: Arc<Self>,
        ticket: Ticket,
        provider: ProviderHandle,
        shardwallet: Address,
        account: Address,
        keep: Option<ShardId>,
    ) {
        let result = tokio::select! {
            _ = ticket.token().cancelled() => {
                debug!(event = "core.store.directory_cancelled", shardwallet = %shardwallet);
                return;
            }
            result = enumerate_shards(provider.chain().as_ref(), shardwallet, account) => result,
        };

        let mut state = self.lock();
        if !state.directory.is_current(&ticket) {
            debug!(event = "core.store.directory_discarded", shardwallet = %shardwallet);
            return;
        }
        if !self.wallet_unchanged(Some(account), &provider) {
            // The store has not applied the wallet change yet and may never
            // see it if the wallet returns to this state, so read again.
            debug!(event = "core.store.directory_retried", shardwallet = %shardwallet);
            self.restart_directory(&mut state, keep);
            self.publish(&state);
            return;
        }
        state.directory.finish(&ticket);

        let event = match result {
            Ok(shard_ids) => {
                state.selected_shard = keep
                    .filter(|shard| shard_ids.contains(shard))
                    .or_else(|| shard_ids.first().copied());
                state.shard_ids = shard_ids.clone();
                self.restart_preview(&mut state);
                Event::ShardsLoaded {
                    shardwallet,
                    account,
                    shard_ids,
                }
            }
            Err(e) => self.record_failure(&mut state, FetchStage::Shards, &e),
        };
        self.publish(&state);
        self.emit(event);
    }

    fn restart_preview(self: &Arc<Self>, state: &mut State) {
        state.balances = None;
        state.clear_failure(FetchStage::Balances);

        let (Some(shardwallet), Some(shard), Some((account, provider))) =
            (state.shardwallet, state.selected_shard, state.connection())
        else {
            state.preview.reset();
            return;
        };
        let ticket = state.preview.restart(&self.shutdown);
        tokio::spawn(
            self.clone()
                .run_preview(ticket, provider, shardwallet, account, shard),
        );
    }

    async fn run_preview(
        self: Arc<Self>,
        ticket: Ticket,
        provider: ProviderHandle,
        shardwallet: Address,
        account: Address,
        shard: ShardId,
    ) {
        let result = tokio::select! {
            _ = ticket.token().cancelled() => {
                debug!(event = "core.store.preview_cancelled", shard = %shard);
                return;
            }
            result = preview_claim(
                provider.chain().as_ref(),
                shardwallet,
                account,
                shard,
                self.currencies,
            ) => result,
        };

        let mut state = self.lock();
        if !state.preview.is_current(&ticket) {
            debug!(event = "core.store.preview_discarded", shard = %shard);
            return;
        }
        if !self.wallet_unchanged(Some(account), &provider) {
            debug!(event = "core.store.preview_retried", shard = %shard);
            self.restart_preview(&mut state);
            self.publish(&state);
            return;
        }
        state.preview.finish(&ticket);

        let event = match result {
            Ok(balances) => {
                state.balances = Some(balances);
                Event::BalancesLoaded { shard }
            }
            Err(e) => self.record_failure(&mut state, FetchStage::Balances, &e),
        };
        self.publish(&state);
        self.emit(event);
    }

    fn restart_price(self: &Arc<Self>, state: &mut State) {
        state.price = None;
        state.clear_failure(FetchStage::Price);

        let Some(provider) = state.wallet.provider.clone() else {
            state.price_fetch.reset();
            return;
        };
        let ticket = state.price_fetch.restart(&self.shutdown);
        tokio::spawn(self.clone().run_price(ticket, provider));
    }

    async fn run_price(self: Arc<Self>, ticket: Ticket, provider: ProviderHandle) {
        let result = tokio::select! {
            _ = ticket.token().cancelled() => {
                debug!(event = "core.store.price_cancelled");
                return;
            }
            result = fetch_price(provider.chain().as_ref(), self.oracle) => result,
        };

        let mut state = self.lock();
        if !state.price_fetch.is_current(&ticket) {
            debug!(event = "core.store.price_discarded");
            return;
        }
        if !self.wallet_unchanged(None, &provider) {
            debug!(event = "core.store.price_retried");
            self.restart_price(&mut state);
            self.publish(&state);
            return;
        }
        state.price_fetch.finish(&ticket);

        let event = match result {
            Ok(price) => {
                state.price = Some(price);
                Event::PriceLoaded { price }
            }
            Err(e) => self.record_failure(&mut state, FetchStage::Price, &e),
        };
        self.publish(&state);
        self.emit(event);
    }

    /// Nothing the preview depends on changes when a claim lands, so it has
    /// to be re-fetched by hand.
    fn refresh_after_claim(self: &Arc<Self>, account: Address, shardwallet: Address, shard: ShardId) {
        let mut state = self.lock();
        if state.wallet.account != Some(account)
            || state.shardwallet != Some(shardwallet)
            || state.selected_shard != Some(shard)
        {
            return;
        }
        self.restart_preview(&mut state);
        self.publish(&state);
    }
}
