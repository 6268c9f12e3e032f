//! In-memory ledger store
//!
//! Every account row owns an async mutex that acts as its exclusive row
//! lock. A unit of work keeps the owned guards of the rows it locked and
//! stages its writes; commit applies them to the committed maps and then
//! releases the guards, rollback or drop just releases them.
//!
//! Plain reads go to the committed maps and never wait on a row lock,
//! like MVCC reads in PostgreSQL. The constraints of the SQL schema are
//! mirrored here so both backends reject the same writes.
//!
//! Not durable: state lives as long as the process.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{LedgerStore, StoreError, UnitOfWork};
use crate::account::{Account, NewAccount};
use crate::core_types::{AccountId, TransactionId};
use crate::transaction::{NewTransaction, TransactionRecord, TransactionStatus};

struct Inner {
    accounts: DashMap<AccountId, Account>,
    row_locks: DashMap<AccountId, Arc<Mutex<()>>>,
    transactions: DashMap<TransactionId, TransactionRecord>,
    next_transaction_id: AtomicI64,
    available: AtomicBool,
}

impl Inner {
    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ))
        }
    }

    fn row_lock(&self, account_id: AccountId) -> Option<Arc<Mutex<()>>> {
        self.row_locks.get(&account_id).map(|l| Arc::clone(l.value()))
    }
}

/// In-memory [`LedgerStore`]
#[derive(Clone)]
pub struct MemoryLedgerStore {
    inner: Arc<Inner>,
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                accounts: DashMap::new(),
                row_locks: DashMap::new(),
                transactions: DashMap::new(),
                next_transaction_id: AtomicI64::new(1),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Simulate losing (false) or regaining (true) connectivity
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::Release);
    }

    /// Number of committed transaction records
    pub fn transaction_count(&self) -> usize {
        self.inner.transactions.len()
    }

    /// Committed transaction records ordered by id
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = self
            .inner
            .transactions
            .iter()
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.transaction_id);
        records
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        self.inner.ensure_available()?;
        Ok(Box::new(MemoryUnitOfWork {
            inner: Arc::clone(&self.inner),
            held: BTreeMap::new(),
            staged_balances: BTreeMap::new(),
            staged_transactions: Vec::new(),
        }))
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        self.inner.ensure_available()?;
        if account.account_id <= 0 {
            return Err(StoreError::CheckViolation(
                "accounts_account_id_check".to_string(),
            ));
        }
        if account.initial_balance < Decimal::ZERO {
            return Err(StoreError::CheckViolation(
                "accounts_balance_check".to_string(),
            ));
        }

        match self.inner.accounts.entry(account.account_id) {
            Entry::Occupied(_) => Err(StoreError::UniqueConstraintViolation(format!(
                "duplicate key value violates unique constraint \"accounts_pkey\": account_id {}",
                account.account_id
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let row = Account {
                    account_id: account.account_id,
                    balance: account.initial_balance,
                    created_at: now,
                    updated_at: now,
                };
                // Lock must exist before the row becomes visible to lockers
                self.inner
                    .row_locks
                    .entry(account.account_id)
                    .or_insert_with(|| Arc::new(Mutex::new(())));
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn fetch_account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.ensure_available()?;
        Ok(self
            .inner
            .accounts
            .get(&account_id)
            .map(|a| a.value().clone()))
    }

    async fn fetch_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        self.inner.ensure_available()?;
        Ok(self
            .inner
            .transactions
            .get(&transaction_id)
            .map(|t| t.value().clone()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.ensure_available()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Unit of work over [`MemoryLedgerStore`]
pub struct MemoryUnitOfWork {
    inner: Arc<Inner>,
    held: BTreeMap<AccountId, OwnedMutexGuard<()>>,
    staged_balances: BTreeMap<AccountId, (Decimal, DateTime<Utc>)>,
    staged_transactions: Vec<TransactionRecord>,
}

impl MemoryUnitOfWork {
    /// Acquire the row lock unless this unit already holds it.
    /// Returns false when the row does not exist.
    async fn acquire(&mut self, account_id: AccountId) -> bool {
        if self.held.contains_key(&account_id) {
            return true;
        }
        let Some(lock) = self.inner.row_lock(account_id) else {
            return false;
        };
        let guard = lock.lock_owned().await;
        self.held.insert(account_id, guard);
        true
    }

    /// Committed row with this unit's staged balance applied
    fn visible_account(&self, account_id: AccountId) -> Option<Account> {
        let mut account = self
            .inner
            .accounts
            .get(&account_id)
            .map(|a| a.value().clone())?;
        if let Some((balance, updated_at)) = self.staged_balances.get(&account_id) {
            account.balance = *balance;
            account.updated_at = *updated_at;
        }
        Some(account)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_account(&mut self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.ensure_available()?;
        if !self.acquire(account_id).await {
            return Ok(None);
        }
        // The lock may have been granted while the store went offline
        self.inner.ensure_available()?;
        Ok(self.visible_account(account_id))
    }

    async fn write_balance(
        &mut self,
        account_id: AccountId,
        balance: Decimal,
    ) -> Result<u64, StoreError> {
        self.inner.ensure_available()?;
        if balance < Decimal::ZERO {
            return Err(StoreError::CheckViolation(
                "accounts_balance_check".to_string(),
            ));
        }
        // UPDATE takes the row lock implicitly
        if !self.acquire(account_id).await {
            return Ok(0);
        }
        self.staged_balances
            .insert(account_id, (balance, Utc::now()));
        Ok(1)
    }

    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, StoreError> {
        self.inner.ensure_available()?;
        let source = transaction.source_account_id();
        let destination = transaction.destination_account_id();

        if transaction.amount() <= Decimal::ZERO {
            return Err(StoreError::CheckViolation(
                "transactions_amount_check".to_string(),
            ));
        }
        if source == destination {
            return Err(StoreError::CheckViolation(
                "transactions_distinct_accounts_check".to_string(),
            ));
        }
        if transaction.status() == TransactionStatus::Failed
            && transaction.error_message().is_none_or(str::is_empty)
        {
            return Err(StoreError::CheckViolation(
                "transactions_failed_message_check".to_string(),
            ));
        }
        for account_id in [source, destination] {
            if !self.inner.accounts.contains_key(&account_id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "account_id {} is not present in table \"accounts\"",
                    account_id
                )));
            }
        }

        // Like BIGSERIAL, ids consumed by rolled-back units are not reused
        let transaction_id = self
            .inner
            .next_transaction_id
            .fetch_add(1, Ordering::SeqCst);
        let record = transaction.clone().into_record(transaction_id, Utc::now());
        self.staged_transactions.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.inner.ensure_available()?;
        let MemoryUnitOfWork {
            inner,
            held,
            staged_balances,
            staged_transactions,
        } = *self;

        for (account_id, (balance, updated_at)) in staged_balances {
            if let Some(mut account) = inner.accounts.get_mut(&account_id) {
                account.balance = balance;
                account.updated_at = updated_at;
            }
        }
        for record in staged_transactions {
            inner.transactions.insert(record.transaction_id, record);
        }

        // Row locks are released only after every write is visible
        drop(held);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        // Staged writes and held guards are discarded with the unit
        Ok(())
    }
}
