//! Data models for ledger accounts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core_types::AccountId;

/// Ledger account
///
/// `balance` is never negative in any committed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account to be inserted; timestamps are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub account_id: AccountId,
    pub initial_balance: Decimal,
}

impl NewAccount {
    pub fn new(account_id: AccountId, initial_balance: Decimal) -> Self {
        Self {
            account_id,
            initial_balance,
        }
    }
}
