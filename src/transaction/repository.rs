//! Repository layer for transaction records

use std::sync::Arc;

use super::models::{NewTransaction, TransactionRecord};
use crate::core_types::TransactionId;
use crate::error::LedgerError;
use crate::store::{LedgerStore, UnitOfWork};

/// Typed access to the append-only transaction history
#[derive(Clone)]
pub struct TransactionRepository {
    store: Arc<dyn LedgerStore>,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Insert a record inside `uow`; returns it with the assigned id
    pub async fn create(
        &self,
        uow: &mut dyn UnitOfWork,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, LedgerError> {
        Ok(uow.insert_transaction(transaction).await?)
    }

    /// Get transaction record by ID
    pub async fn get_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<TransactionRecord, LedgerError> {
        self.store
            .fetch_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::NewAccount;
    use crate::store::MemoryLedgerStore;
    use crate::transaction::TransactionStatus;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_ids_are_sequential_and_readable_after_commit() {
        let store = MemoryLedgerStore::new();
        store.insert_account(&NewAccount::new(1, dec!(10))).await.unwrap();
        store.insert_account(&NewAccount::new(2, dec!(10))).await.unwrap();
        let repo = TransactionRepository::new(Arc::new(store.clone()));

        let mut uow = store.begin().await.unwrap();
        let first = repo
            .create(uow.as_mut(), &NewTransaction::completed(1, 2, dec!(1)))
            .await
            .unwrap();
        let second = repo
            .create(
                uow.as_mut(),
                &NewTransaction::failed(2, 1, dec!(50), "insufficient balance"),
            )
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(second.transaction_id, first.transaction_id + 1);
        let stored = repo.get_by_id(second.transaction_id).await.unwrap();
        assert_eq!(stored.status, TransactionStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("insufficient balance"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = TransactionRepository::new(Arc::new(MemoryLedgerStore::new()));
        assert_eq!(
            repo.get_by_id(5).await.unwrap_err(),
            LedgerError::TransactionNotFound(5)
        );
    }
}
