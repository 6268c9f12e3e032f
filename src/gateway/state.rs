use std::sync::Arc;

use crate::account::{AccountRepository, AccountService};
use crate::store::LedgerStore;
use crate::transaction::TransactionRepository;
use crate::transfer::TransferEngine;

/// Gateway application state (shared by all handlers)
#[derive(Clone)]
pub struct AppState {
    /// Ledger store, used directly only for health checks
    pub store: Arc<dyn LedgerStore>,
    pub accounts: Arc<AccountService>,
    pub transfers: TransferEngine,
    pub transactions: TransactionRepository,
    /// Build revision reported by /health
    pub version: &'static str,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(AccountRepository::new(store.clone()))),
            transfers: TransferEngine::new(store.clone()),
            transactions: TransactionRepository::new(store.clone()),
            store,
            version: crate::GIT_HASH,
        }
    }
}
