//! Transfer FSM State Definitions
//!
//! A transfer runs entirely inside one store unit of work, so the states
//! below are never persisted. They drive logging and let tests assert that
//! every attempt ends in exactly one terminal state.

use std::fmt;

/// Transfer FSM States
///
/// ```text
/// VALIDATING → LOCKING → APPLYING → RECORDING → COMMITTED_SUCCESS
///       ↓          ↓         ↓           ↓
///  ROLLED_BACK     └→ INSUFFICIENT_FUNDS → RECORDING → COMMITTED_FAILED
/// ```
///
/// Terminal: COMMITTED_SUCCESS, COMMITTED_FAILED, ROLLED_BACK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    /// Input checks, no store access yet
    Validating,

    /// Acquiring both row locks in ascending id order
    Locking,

    /// Source balance below amount; a failed record will be written
    InsufficientFunds,

    /// Writing both new balances
    Applying,

    /// Inserting the transaction record
    Recording,

    /// Terminal: balances moved and a completed record committed
    CommittedSuccess,

    /// Terminal: balances untouched and a failed record committed
    CommittedFailed,

    /// Terminal: nothing persisted
    RolledBack,
}

impl TransferState {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::CommittedSuccess
                | TransferState::CommittedFailed
                | TransferState::RolledBack
        )
    }

    /// Whether a transaction record exists once this state is reached
    #[inline]
    pub fn is_recorded(&self) -> bool {
        matches!(
            self,
            TransferState::CommittedSuccess | TransferState::CommittedFailed
        )
    }

    /// Legal FSM edges. Every non-terminal state may fall to `RolledBack`.
    pub fn can_transition_to(&self, next: TransferState) -> bool {
        use TransferState::*;
        match (self, next) {
            (s, RolledBack) => !s.is_terminal(),
            (Validating, Locking) => true,
            (Locking, InsufficientFunds) | (Locking, Applying) => true,
            (InsufficientFunds, Recording) | (Applying, Recording) => true,
            (Recording, CommittedSuccess) | (Recording, CommittedFailed) => true,
            _ => false,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Validating => "VALIDATING",
            TransferState::Locking => "LOCKING",
            TransferState::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferState::Applying => "APPLYING",
            TransferState::Recording => "RECORDING",
            TransferState::CommittedSuccess => "COMMITTED_SUCCESS",
            TransferState::CommittedFailed => "COMMITTED_FAILED",
            TransferState::RolledBack => "ROLLED_BACK",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
