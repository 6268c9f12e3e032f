//! Ledger Store
//!
//! Transactional storage for accounts and transaction records.
//!
//! # Contract
//!
//! - [`LedgerStore::begin`] opens a [`UnitOfWork`]. Everything written
//!   through the unit becomes visible atomically on [`UnitOfWork::commit`],
//!   or not at all.
//! - [`UnitOfWork::lock_account`] reads a row under an exclusive lock held
//!   until the unit ends. A second locker of the same row blocks until then.
//! - [`UnitOfWork::write_balance`] reports the number of rows affected; zero
//!   means the row does not exist.
//! - Dropping a unit without committing rolls it back. Early returns, panics
//!   and cancelled futures therefore never leave locks or partial writes.
//!
//! Two backends implement the contract:
//! - [`postgres::PgLedgerStore`]: `sqlx` transactions and `SELECT ... FOR UPDATE`
//! - [`memory::MemoryLedgerStore`]: per-row async mutexes, staged writes

pub mod memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::{Account, NewAccount};
use crate::core_types::{AccountId, TransactionId};
use crate::transaction::{NewTransaction, TransactionRecord};

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Store-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unique constraint violation: {0}")]
    UniqueConstraintViolation(String),

    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Failed to decode row: {0}")]
    Decode(String),

    #[error("Query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Connectivity problems, as opposed to rejected statements
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) => {
                let msg = db.message().to_string();
                match db.code().as_deref() {
                    Some("23505") => StoreError::UniqueConstraintViolation(msg),
                    Some("23514") => StoreError::CheckViolation(msg),
                    Some("23503") => StoreError::ForeignKeyViolation(msg),
                    _ => StoreError::Query(e.to_string()),
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => StoreError::Decode(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

/// Shared handle to a ledger backend
///
/// Created once at startup and passed explicitly to every component.
#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    /// Open a new atomic unit of work
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Insert a new account (auto-committed)
    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError>;

    /// Plain read of committed state, never blocks on row locks
    async fn fetch_account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Plain read of a transaction record
    async fn fetch_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionRecord>, StoreError>;

    /// Connectivity check
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;
}

/// One atomic unit of work against a [`LedgerStore`]
#[async_trait]
pub trait UnitOfWork: Send {
    /// Read an account and hold its exclusive row lock until the unit ends
    async fn lock_account(&mut self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Overwrite balance and update timestamp; returns rows affected
    async fn write_balance(
        &mut self,
        account_id: AccountId,
        balance: Decimal,
    ) -> Result<u64, StoreError>;

    /// Append a transaction record; the store assigns id and timestamp
    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, StoreError>;

    /// Durably apply every write of this unit and release its locks
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard every write of this unit and release its locks
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(StoreError::from(sqlx::Error::PoolClosed).is_unavailable());
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(StoreError::from(sqlx::Error::Io(io)).is_unavailable());
    }

    #[test]
    fn test_row_not_found_is_query_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Query(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_display() {
        let err = StoreError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
    }
}
