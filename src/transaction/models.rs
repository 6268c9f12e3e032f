//! Data models for transaction records
//!
//! Transaction records are append-only: the store assigns the id and the
//! creation timestamp, and nothing ever updates a row afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core_types::{AccountId, TransactionId};

/// Error message stored on records of transfers rejected for lack of funds
pub const INSUFFICIENT_BALANCE_MESSAGE: &str = "insufficient balance";

/// Transaction status, stored as TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Completed,
    Failed,
    Pending,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "pending" => Ok(TransactionStatus::Pending),
            other => Err(format!("unknown transaction status: {}", other)),
        }
    }
}

/// Persisted transaction record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

/// Transaction record before insertion
///
/// Built through [`NewTransaction::completed`] or [`NewTransaction::failed`]
/// so a `failed` status always carries an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    source_account_id: AccountId,
    destination_account_id: AccountId,
    amount: Decimal,
    status: TransactionStatus,
    error_message: Option<String>,
}

impl NewTransaction {
    pub fn completed(source: AccountId, destination: AccountId, amount: Decimal) -> Self {
        Self {
            source_account_id: source,
            destination_account_id: destination,
            amount,
            status: TransactionStatus::Completed,
            error_message: None,
        }
    }

    pub fn failed(
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
        error_message: impl Into<String>,
    ) -> Self {
        let mut message = error_message.into();
        if message.is_empty() {
            message = "transfer failed".to_string();
        }
        Self {
            source_account_id: source,
            destination_account_id: destination,
            amount,
            status: TransactionStatus::Failed,
            error_message: Some(message),
        }
    }

    pub fn source_account_id(&self) -> AccountId {
        self.source_account_id
    }

    pub fn destination_account_id(&self) -> AccountId {
        self.destination_account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Materialize the stored record once the store has assigned id and time
    pub fn into_record(
        self,
        transaction_id: TransactionId,
        created_at: DateTime<Utc>,
    ) -> TransactionRecord {
        TransactionRecord {
            transaction_id,
            source_account_id: self.source_account_id,
            destination_account_id: self.destination_account_id,
            amount: self.amount,
            status: self.status,
            created_at,
            error_message: self.error_message,
        }
    }
}
