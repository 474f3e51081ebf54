use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::ChainProvider;
use crate::types::Address;
use crate::wallet::errors::WalletError;

/// An injected wallet, such as a browser extension or a signer service.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Ask the user to expose their accounts. This is the consent prompt.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Accounts already exposed to this application, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// A provider bound to the wallet's current chain.
    fn provider(&self) -> Arc<dyn ChainProvider>;
}

/// A provider together with the identity it was installed under.
///
/// Two handles are equal only if they come from the same installation, so a
/// reconnect or chain switch always looks like a new provider even when the
/// backend hands out the same object.
#[derive(Clone)]
pub struct ProviderHandle {
    id: u64,
    chain: Arc<dyn ChainProvider>,
}

impl ProviderHandle {
    pub(crate) fn new(id: u64, chain: Arc<dyn ChainProvider>) -> Self {
        Self { id, chain }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn chain(&self) -> &Arc<dyn ChainProvider> {
        &self.chain
    }
}

impl PartialEq for ProviderHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProviderHandle {}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle").field("id", &self.id).finish()
    }
}

/// What the wallet currently exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub provider: Option<ProviderHandle>,
}

impl WalletState {
    pub fn is_connected(&self) -> bool {
        self.account.is_some() && self.provider.is_some()
    }
}
