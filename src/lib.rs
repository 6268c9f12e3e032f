//! Internal Transfers - account ledger with atomic transfers
//!
//! # Modules
//!
//! - [`core_types`] - Account and transaction id aliases
//! - [`store`] - Ledger store contract with PostgreSQL and in-memory backends
//! - [`account`] - Account rows, repository and service
//! - [`transaction`] - Immutable transfer records
//! - [`transfer`] - Transfer engine (lock ordering, commit/rollback)
//! - [`error`] - Ledger error taxonomy
//! - [`gateway`] - HTTP API
//! - [`config`] / [`logging`] / [`db`] - Process plumbing

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod store;
pub mod transaction;
pub mod transfer;

/// Git revision embedded by build.rs
pub const GIT_HASH: &str = env!("GIT_HASH");

// Convenient re-exports at crate root
pub use account::{Account, AccountService, NewAccount};
pub use core_types::{AccountId, TransactionId};
pub use error::{ErrorKind, LedgerError};
pub use store::{LedgerStore, MemoryLedgerStore, PgLedgerStore, StoreError, UnitOfWork};
pub use transaction::{TransactionRecord, TransactionStatus};
pub use transfer::{TransferEngine, TransferRequest, TransferState};
