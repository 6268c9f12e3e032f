//! Repository layer for account rows

use std::sync::Arc;

use rust_decimal::Decimal;

use super::models::{Account, NewAccount};
use crate::core_types::AccountId;
use crate::error::LedgerError;
use crate::store::{LedgerStore, StoreError, UnitOfWork};

/// Typed access to account rows of a [`LedgerStore`]
#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn LedgerStore>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Insert a new account
    pub async fn create(&self, account: &NewAccount) -> Result<Account, LedgerError> {
        match self.store.insert_account(account).await {
            Ok(row) => Ok(row),
            Err(StoreError::UniqueConstraintViolation(_)) => {
                Err(LedgerError::AccountExists(account.account_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get account by ID (no lock)
    pub async fn get_by_id(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .fetch_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Get account by ID and hold its row lock until `uow` ends
    pub async fn get_by_id_for_update(
        &self,
        uow: &mut dyn UnitOfWork,
        account_id: AccountId,
    ) -> Result<Account, LedgerError> {
        uow.lock_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Overwrite the balance of an account
    pub async fn update_balance(
        &self,
        uow: &mut dyn UnitOfWork,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> Result<(), LedgerError> {
        let rows = uow.write_balance(account_id, new_balance).await?;
        if rows == 0 {
            return Err(LedgerError::AccountNotFound(account_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;
    use rust_decimal_macros::dec;

    fn repo() -> (AccountRepository, MemoryLedgerStore) {
        let store = MemoryLedgerStore::new();
        (AccountRepository::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (repo, _) = repo();
        let created = repo.create(&NewAccount::new(1, dec!(100.00))).await.unwrap();
        assert_eq!(created.balance, dec!(100.00));

        let fetched = repo.get_by_id(1).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_account_exists() {
        let (repo, _) = repo();
        repo.create(&NewAccount::new(1, dec!(100.00))).await.unwrap();
        let err = repo
            .create(&NewAccount::new(1, dec!(5.00)))
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::AccountExists(1));
        assert_eq!(repo.get_by_id(1).await.unwrap().balance, dec!(100.00));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (repo, _) = repo();
        assert_eq!(
            repo.get_by_id(7).await.unwrap_err(),
            LedgerError::AccountNotFound(7)
        );
    }

    #[tokio::test]
    async fn test_update_balance_inside_unit_of_work() {
        let (repo, store) = repo();
        repo.create(&NewAccount::new(1, dec!(10))).await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let locked = repo.get_by_id_for_update(uow.as_mut(), 1).await.unwrap();
        assert_eq!(locked.balance, dec!(10));
        repo.update_balance(uow.as_mut(), 1, dec!(2.5)).await.unwrap();
        assert_eq!(
            repo.update_balance(uow.as_mut(), 99, dec!(1)).await.unwrap_err(),
            LedgerError::AccountNotFound(99)
        );
        uow.commit().await.unwrap();

        assert_eq!(repo.get_by_id(1).await.unwrap().balance, dec!(2.5));
    }

    #[tokio::test]
    async fn test_store_unavailable_propagates() {
        let (repo, store) = repo();
        store.set_available(false);
        let err = repo.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Unavailable(_))));
    }
}
