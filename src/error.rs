//! Ledger error types
//!
//! Every failure of the account service, the repositories and the transfer
//! engine is a [`LedgerError`]. Domain errors carry the offending id or
//! amount; store errors keep their detail for logs and are reduced to an
//! opaque message at the HTTP boundary.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core_types::{AccountId, TransactionId};
use crate::store::StoreError;

/// Coarse error taxonomy used for HTTP mapping and logging policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any store access, no side effects
    InvalidInput,
    NotFound,
    Conflict,
    /// Recorded as a `failed` transaction, not a silent rejection
    InsufficientBalance,
    StoreFailure,
}

/// Which side of a transfer an id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Source,
    Destination,
    Account,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Source => f.write_str("source"),
            AccountRole::Destination => f.write_str("destination"),
            AccountRole::Account => f.write_str("account"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Validation Errors ===
    #[error("Invalid transaction amount: {0} (must be greater than zero)")]
    InvalidAmount(Decimal),

    #[error("Cannot transfer to same account: account_id {0}")]
    SelfTransfer(AccountId),

    #[error("Invalid account ID: {role} account_id {account_id}")]
    InvalidAccountId {
        role: AccountRole,
        account_id: AccountId,
    },

    #[error("Balance cannot be negative: {0}")]
    NegativeBalance(Decimal),

    // === Lookup Errors ===
    #[error("Account not found: account_id {0}")]
    AccountNotFound(AccountId),

    #[error("Transaction not found: transaction_id {0}")]
    TransactionNotFound(TransactionId),

    // === Conflict ===
    #[error("Account already exists: account_id {0}")]
    AccountExists(AccountId),

    // === Business Outcome ===
    #[error(
        "Insufficient balance: account_id {account_id} has {balance}, requested {requested} (recorded as transaction {transaction_id})"
    )]
    InsufficientBalance {
        account_id: AccountId,
        balance: Decimal,
        requested: Decimal,
        transaction_id: TransactionId,
    },

    // === System Errors ===
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Balance arithmetic overflow on account_id {0}")]
    Overflow(AccountId),

    #[error("Balance on account_id {0} cannot hold the transfer amount exactly")]
    PrecisionLoss(AccountId),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount(_)
            | LedgerError::SelfTransfer(_)
            | LedgerError::InvalidAccountId { .. }
            | LedgerError::NegativeBalance(_) => ErrorKind::InvalidInput,
            LedgerError::AccountNotFound(_) | LedgerError::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            LedgerError::AccountExists(_) => ErrorKind::Conflict,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::Store(_) | LedgerError::Overflow(_) | LedgerError::PrecisionLoss(_) => {
                ErrorKind::StoreFailure
            }
        }
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::SelfTransfer(_) => "SELF_TRANSFER",
            LedgerError::InvalidAccountId { .. } => "INVALID_ACCOUNT_ID",
            LedgerError::NegativeBalance(_) => "NEGATIVE_BALANCE",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            LedgerError::AccountExists(_) => "ACCOUNT_EXISTS",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::Store(StoreError::Unavailable(_)) => "STORE_UNAVAILABLE",
            LedgerError::Store(_) | LedgerError::Overflow(_) | LedgerError::PrecisionLoss(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InsufficientBalance => 422,
            ErrorKind::StoreFailure => match self {
                LedgerError::Store(StoreError::Unavailable(_)) => 503,
                _ => 500,
            },
        }
    }

    /// Message safe to hand to API callers: store internals are withheld
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::StoreFailure if self.http_status() == 503 => {
                "Service temporarily unavailable".to_string()
            }
            ErrorKind::StoreFailure => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}
