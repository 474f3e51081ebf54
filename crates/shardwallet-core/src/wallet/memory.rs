//! Wallet backend over a [`MemoryChain`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::chain::{ChainProvider, MemoryChain};
use crate::types::Address;
use crate::wallet::errors::WalletError;
use crate::wallet::types::WalletBackend;

/// Exposes the fixture's accounts once consent has been given.
#[derive(Debug)]
pub struct MemoryWallet {
    chain: Arc<MemoryChain>,
    consent: bool,
    authorized: AtomicBool,
}

impl MemoryWallet {
    /// A wallet whose user approves the connection prompt.
    pub fn new(chain: Arc<MemoryChain>) -> Self {
        Self {
            chain,
            consent: true,
            authorized: AtomicBool::new(false),
        }
    }

    /// A wallet whose user declines the connection prompt.
    pub fn rejecting(chain: Arc<MemoryChain>) -> Self {
        Self {
            consent: false,
            ..Self::new(chain)
        }
    }

    pub fn chain(&self) -> &Arc<MemoryChain> {
        &self.chain
    }
}

#[async_trait]
impl WalletBackend for MemoryWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        if !self.consent {
            return Err(WalletError::Rejected);
        }
        self.authorized.store(true, Ordering::Release);
        Ok(self.chain.accounts())
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.authorized.load(Ordering::Acquire) {
            Ok(self.chain.accounts())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain.chain_id())
    }

    fn provider(&self) -> Arc<dyn ChainProvider> {
        self.chain.clone()
    }
}
