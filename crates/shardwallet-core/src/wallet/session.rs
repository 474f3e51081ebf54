use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::types::Address;
use crate::wallet::errors::WalletError;
use crate::wallet::types::{ProviderHandle, WalletBackend, WalletState};

/// Tracks the connected account, chain and provider of one wallet.
///
/// Cloning gives another handle to the same session. State changes are
/// published on a watch channel; see [`WalletSession::subscribe`].
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    backend: Option<Arc<dyn WalletBackend>>,
    state: watch::Sender<WalletState>,
    next_provider_id: AtomicU64,
}

impl WalletSession {
    /// `None` means no wallet is present; the session then stays disconnected.
    pub fn new(backend: Option<Arc<dyn WalletBackend>>) -> Self {
        let (state, _) = watch::channel(WalletState::default());
        Self {
            inner: Arc::new(SessionInner {
                backend,
                state,
                next_provider_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn state(&self) -> WalletState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.inner.state.subscribe()
    }

    /// Ask the wallet for consent and load its state.
    ///
    /// A missing wallet or a declined prompt leaves the session disconnected
    /// and returns `false`.
    pub async fn connect(&self) -> bool {
        let backend = match self.backend() {
            Ok(backend) => backend,
            Err(e) => {
                warn!(event = "core.wallet.connect_failed", error = %e);
                return false;
            }
        };

        info!(event = "core.wallet.connect_started");

        let accounts = match backend.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(event = "core.wallet.connect_failed", error = %e);
                return false;
            }
        };
        self.handle_accounts_changed(&accounts);

        match self.handle_connect().await {
            Ok(()) => true,
            Err(e) => {
                warn!(event = "core.wallet.connect_failed", error = %e);
                false
            }
        }
    }

    /// Load accounts and chain id and install a fresh provider.
    pub async fn handle_connect(&self) -> Result<(), WalletError> {
        let backend = self.backend()?;
        let (accounts, chain_id) = tokio::try_join!(backend.accounts(), backend.chain_id())?;
        let provider = self.install_provider(backend.as_ref());
        let account = accounts.first().copied();

        self.inner.state.send_modify(|state| {
            state.account = account;
            state.chain_id = Some(chain_id);
            state.provider = Some(provider);
        });

        info!(
            event = "core.wallet.connect_completed",
            account = ?account,
            chain_id = chain_id
        );
        Ok(())
    }

    /// The first exposed account becomes current; an empty list disconnects it.
    pub fn handle_accounts_changed(&self, accounts: &[Address]) {
        let account = accounts.first().copied();
        let changed = self.inner.state.send_if_modified(|state| {
            if state.account == account {
                return false;
            }
            state.account = account;
            true
        });
        if changed {
            info!(event = "core.wallet.account_changed", account = ?account);
        }
    }

    /// Data read through the previous chain is invalid, so a new provider
    /// identity is installed even if the backend is unchanged.
    pub fn handle_chain_changed(&self, chain_id: u64) {
        let Ok(backend) = self.backend() else {
            return;
        };
        let provider = self.install_provider(backend.as_ref());
        self.inner.state.send_modify(|state| {
            state.chain_id = Some(chain_id);
            state.provider = Some(provider);
        });
        info!(event = "core.wallet.chain_changed", chain_id = chain_id);
    }

    pub fn handle_disconnect(&self) {
        self.inner.state.send_replace(WalletState::default());
        info!(event = "core.wallet.disconnected");
    }

    fn backend(&self) -> Result<&Arc<dyn WalletBackend>, WalletError> {
        self.inner.backend.as_ref().ok_or(WalletError::NoWallet)
    }

    fn install_provider(&self, backend: &dyn WalletBackend) -> ProviderHandle {
        let id = self.inner.next_provider_id.fetch_add(1, Ordering::Relaxed);
        ProviderHandle::new(id, backend.provider())
    }
}
