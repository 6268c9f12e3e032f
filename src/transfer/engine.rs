//! Transfer Engine
//!
//! Moves funds between two accounts inside a single store unit of work.
//! Both rows are locked in ascending id order, so two transfers touching the
//! same pair of accounts in opposite directions queue behind one another
//! instead of deadlocking.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::state::TransferState;
use crate::account::{Account, AccountRepository};
use crate::core_types::AccountId;
use crate::error::{AccountRole, LedgerError};
use crate::store::{LedgerStore, UnitOfWork};
use crate::transaction::{
    INSUFFICIENT_BALANCE_MESSAGE, NewTransaction, TransactionRecord, TransactionRepository,
};

/// A transfer request as accepted by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
    ) -> Self {
        Self {
            source_account_id,
            destination_account_id,
            amount,
        }
    }

    /// Input checks that need no store access
    ///
    /// Order matters for the reported error: amount, then self-transfer,
    /// then source id, then destination id.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(self.amount));
        }
        if self.source_account_id == self.destination_account_id {
            return Err(LedgerError::SelfTransfer(self.source_account_id));
        }
        if self.source_account_id <= 0 {
            return Err(LedgerError::InvalidAccountId {
                role: AccountRole::Source,
                account_id: self.source_account_id,
            });
        }
        if self.destination_account_id <= 0 {
            return Err(LedgerError::InvalidAccountId {
                role: AccountRole::Destination,
                account_id: self.destination_account_id,
            });
        }
        Ok(())
    }
}

/// Global lock order for a pair of accounts: lower id first
#[inline]
pub fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Map rows locked in id order back to (source, destination)
fn assign_roles(source_id: AccountId, first: Account, second: Account) -> (Account, Account) {
    if first.account_id == source_id {
        (first, second)
    } else {
        (second, first)
    }
}

/// Committed result of a unit of work that got past locking
enum Outcome {
    Completed(TransactionRecord),
    Insufficient {
        record: TransactionRecord,
        balance: Decimal,
    },
}

/// Per-attempt FSM tracker
struct Attempt {
    source: AccountId,
    destination: AccountId,
    state: TransferState,
}

impl Attempt {
    fn new(request: &TransferRequest) -> Self {
        Self {
            source: request.source_account_id,
            destination: request.destination_account_id,
            state: TransferState::Validating,
        }
    }

    fn advance(&mut self, next: TransferState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transfer transition {} -> {}",
            self.state,
            next
        );
        debug!(
            source_account_id = self.source,
            destination_account_id = self.destination,
            from = %self.state,
            to = %next,
            "transfer state transition"
        );
        self.state = next;
    }
}

/// Stateless transfer executor; safe to share across tasks
#[derive(Clone)]
pub struct TransferEngine {
    store: Arc<dyn LedgerStore>,
    accounts: AccountRepository,
    transactions: TransactionRepository,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            transactions: TransactionRepository::new(store.clone()),
            store,
        }
    }

    /// Transfer `amount` from `source_account_id` to `destination_account_id`
    ///
    /// Returns the committed `completed` record. An insufficient source
    /// balance still commits a `failed` record and is reported as
    /// [`LedgerError::InsufficientBalance`] carrying that record's id.
    pub async fn execute_transfer(
        &self,
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
    ) -> Result<TransactionRecord, LedgerError> {
        let request = TransferRequest::new(source_account_id, destination_account_id, amount);
        self.execute(&request).await.1
    }

    /// Same as [`execute_transfer`](Self::execute_transfer), also returning
    /// the terminal FSM state the attempt ended in
    ///
    /// Runs inside a `transfer` span, so every event of the attempt carries
    /// the account pair and the amount.
    pub async fn execute(
        &self,
        request: &TransferRequest,
    ) -> (TransferState, Result<TransactionRecord, LedgerError>) {
        let span = info_span!(
            "transfer",
            source_account_id = request.source_account_id,
            destination_account_id = request.destination_account_id,
            amount = %request.amount,
        );
        self.run(request).instrument(span).await
    }

    async fn run(
        &self,
        request: &TransferRequest,
    ) -> (TransferState, Result<TransactionRecord, LedgerError>) {
        let mut attempt = Attempt::new(request);

        if let Err(e) = request.validate() {
            warn!(
                source_account_id = request.source_account_id,
                destination_account_id = request.destination_account_id,
                amount = %request.amount,
                error = %e,
                "transfer rejected"
            );
            attempt.advance(TransferState::RolledBack);
            return (attempt.state, Err(e));
        }

        attempt.advance(TransferState::Locking);
        let mut uow = match self.store.begin().await {
            Ok(uow) => uow,
            Err(e) => {
                error!(error = %e, "failed to begin unit of work");
                attempt.advance(TransferState::RolledBack);
                return (attempt.state, Err(e.into()));
            }
        };

        let outcome = match self.apply(uow.as_mut(), request, &mut attempt).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(rb) = uow.rollback().await {
                    warn!(error = %rb, "rollback failed, unit of work discarded");
                }
                log_failure(request, &e);
                attempt.advance(TransferState::RolledBack);
                return (attempt.state, Err(e));
            }
        };

        if let Err(e) = uow.commit().await {
            let e = LedgerError::from(e);
            log_failure(request, &e);
            attempt.advance(TransferState::RolledBack);
            return (attempt.state, Err(e));
        }

        match outcome {
            Outcome::Completed(record) => {
                attempt.advance(TransferState::CommittedSuccess);
                info!(
                    transaction_id = record.transaction_id,
                    source_account_id = record.source_account_id,
                    destination_account_id = record.destination_account_id,
                    amount = %record.amount,
                    "transfer completed"
                );
                (attempt.state, Ok(record))
            }
            Outcome::Insufficient { record, balance } => {
                attempt.advance(TransferState::CommittedFailed);
                warn!(
                    transaction_id = record.transaction_id,
                    source_account_id = record.source_account_id,
                    balance = %balance,
                    requested = %record.amount,
                    "transfer failed: insufficient balance"
                );
                (
                    attempt.state,
                    Err(LedgerError::InsufficientBalance {
                        account_id: record.source_account_id,
                        balance,
                        requested: record.amount,
                        transaction_id: record.transaction_id,
                    }),
                )
            }
        }
    }

    /// Everything between begin and commit. Any `Err` leaves the unit of
    /// work uncommitted.
    async fn apply(
        &self,
        uow: &mut dyn UnitOfWork,
        request: &TransferRequest,
        attempt: &mut Attempt,
    ) -> Result<Outcome, LedgerError> {
        let (first_id, second_id) =
            lock_order(request.source_account_id, request.destination_account_id);
        let first = self.accounts.get_by_id_for_update(uow, first_id).await?;
        let second = self.accounts.get_by_id_for_update(uow, second_id).await?;
        let (source, destination) = assign_roles(request.source_account_id, first, second);

        if source.balance < request.amount {
            attempt.advance(TransferState::InsufficientFunds);
            attempt.advance(TransferState::Recording);
            let failed = NewTransaction::failed(
                source.account_id,
                destination.account_id,
                request.amount,
                INSUFFICIENT_BALANCE_MESSAGE,
            );
            let record = self.transactions.create(uow, &failed).await?;
            return Ok(Outcome::Insufficient {
                record,
                balance: source.balance,
            });
        }

        attempt.advance(TransferState::Applying);
        let (new_source, new_destination) = move_funds(&source, &destination, request.amount)?;

        self.accounts
            .update_balance(uow, source.account_id, new_source)
            .await?;
        self.accounts
            .update_balance(uow, destination.account_id, new_destination)
            .await?;

        attempt.advance(TransferState::Recording);
        let completed =
            NewTransaction::completed(source.account_id, destination.account_id, request.amount);
        let record = self.transactions.create(uow, &completed).await?;
        Ok(Outcome::Completed(record))
    }
}

/// New (source, destination) balances after moving `amount`
///
/// `checked_*` only reports integer overflow. A result needing more than 28
/// significant digits is rounded silently, so each side must differ from its
/// old balance by exactly `amount`.
fn move_funds(
    source: &Account,
    destination: &Account,
    amount: Decimal,
) -> Result<(Decimal, Decimal), LedgerError> {
    let new_source = source
        .balance
        .checked_sub(amount)
        .ok_or(LedgerError::Overflow(source.account_id))?;
    if source.balance.checked_sub(new_source) != Some(amount) {
        return Err(LedgerError::PrecisionLoss(source.account_id));
    }

    let new_destination = destination
        .balance
        .checked_add(amount)
        .ok_or(LedgerError::Overflow(destination.account_id))?;
    if new_destination.checked_sub(destination.balance) != Some(amount) {
        return Err(LedgerError::PrecisionLoss(destination.account_id));
    }

    Ok((new_source, new_destination))
}

fn log_failure(request: &TransferRequest, e: &LedgerError) {
    match e {
        LedgerError::Store(_) | LedgerError::Overflow(_) | LedgerError::PrecisionLoss(_) => error!(
            source_account_id = request.source_account_id,
            destination_account_id = request.destination_account_id,
            error = %e,
            "transfer rolled back"
        ),
        _ => warn!(
            source_account_id = request.source_account_id,
            destination_account_id = request.destination_account_id,
            error = %e,
            "transfer rolled back"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn account(id: AccountId, balance: Decimal) -> Account {
        let now = Utc::now();
        Account {
            account_id: id,
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_lock_order_is_ascending() {
        assert_eq!(lock_order(5, 3), (3, 5));
        assert_eq!(lock_order(3, 5), (3, 5));
        assert_eq!(lock_order(-1, 2), (-1, 2));
    }

    #[test]
    fn test_assign_roles_restores_direction() {
        let (src, dst) = assign_roles(9, account(2, dec!(1)), account(9, dec!(5)));
        assert_eq!((src.account_id, dst.account_id), (9, 2));

        let (src, dst) = assign_roles(2, account(2, dec!(1)), account(9, dec!(5)));
        assert_eq!((src.account_id, dst.account_id), (2, 9));
    }

    #[test]
    fn test_validation_order() {
        // Zero amount wins over self-transfer and bad ids
        assert_eq!(
            TransferRequest::new(0, 0, dec!(0)).validate(),
            Err(LedgerError::InvalidAmount(dec!(0)))
        );
        assert_eq!(
            TransferRequest::new(-3, -3, dec!(1)).validate(),
            Err(LedgerError::SelfTransfer(-3))
        );
        assert_eq!(
            TransferRequest::new(-1, -2, dec!(1)).validate(),
            Err(LedgerError::InvalidAccountId {
                role: AccountRole::Source,
                account_id: -1
            })
        );
        assert_eq!(
            TransferRequest::new(1, 0, dec!(1)).validate(),
            Err(LedgerError::InvalidAccountId {
                role: AccountRole::Destination,
                account_id: 0
            })
        );
        assert!(TransferRequest::new(1, 2, dec!(0.01)).validate().is_ok());
    }

    #[test]
    fn test_move_funds_is_exact() {
        let (src, dst) = move_funds(&account(1, dec!(100.00)), &account(2, dec!(50)), dec!(30.005))
            .unwrap();
        assert_eq!(src, dec!(69.995));
        assert_eq!(dst, dec!(80.005));
    }

    #[test]
    fn test_move_funds_rejects_rounding() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(
            move_funds(&account(1, dec!(1)), &account(2, dec!(10000000000)), tiny),
            Err(LedgerError::PrecisionLoss(2))
        );
        assert_eq!(
            move_funds(&account(1, dec!(10000000000)), &account(2, dec!(1)), tiny),
            Err(LedgerError::PrecisionLoss(1))
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert_eq!(
            TransferRequest::new(1, 2, dec!(-5)).validate(),
            Err(LedgerError::InvalidAmount(dec!(-5)))
        );
    }
}
