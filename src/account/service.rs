//! Account business logic: creation and lookup

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::models::{Account, NewAccount};
use super::repository::AccountRepository;
use crate::core_types::AccountId;
use crate::error::{AccountRole, LedgerError};

pub struct AccountService {
    accounts: AccountRepository,
}

impl AccountService {
    pub fn new(accounts: AccountRepository) -> Self {
        Self { accounts }
    }

    /// Create an account with a caller-chosen id and initial balance
    ///
    /// Zero is an accepted initial balance; only negatives are rejected.
    pub async fn create_account(&self, request: NewAccount) -> Result<Account, LedgerError> {
        if request.initial_balance < Decimal::ZERO {
            warn!(
                account_id = request.account_id,
                balance = %request.initial_balance,
                "attempted to create account with negative balance"
            );
            return Err(LedgerError::NegativeBalance(request.initial_balance));
        }

        if request.account_id <= 0 {
            warn!(
                account_id = request.account_id,
                "attempted to create account with invalid ID"
            );
            return Err(LedgerError::InvalidAccountId {
                role: AccountRole::Account,
                account_id: request.account_id,
            });
        }

        match self.accounts.create(&request).await {
            Ok(account) => {
                info!(
                    account_id = account.account_id,
                    balance = %account.balance,
                    "account created successfully"
                );
                Ok(account)
            }
            Err(e) => {
                warn!(account_id = request.account_id, error = %e, "failed to create account");
                Err(e)
            }
        }
    }

    pub async fn get_account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        if account_id <= 0 {
            return Err(LedgerError::InvalidAccountId {
                role: AccountRole::Account,
                account_id,
            });
        }
        self.accounts.get_by_id(account_id).await
    }
}
