//! Internal transfer engine
//!
//! Moves funds between two ledger accounts atomically.
//!
//! # State Machine
//!
//! ```text
//! VALIDATING → LOCKING → APPLYING → RECORDING → COMMITTED_SUCCESS
//!                  ↓                    ↑
//!          INSUFFICIENT_FUNDS ──────────┘→ COMMITTED_FAILED
//!
//! any non-terminal state → ROLLED_BACK
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Lock Order**: rows are always locked lower account id first
//! 2. **All or Nothing**: both balance writes and the record commit together
//! 3. **Recorded Failure**: an insufficient balance commits a `failed` record
//! 4. **Drop is Rollback**: an abandoned unit of work never commits

pub mod engine;
pub mod state;


pub use engine::{TransferEngine, TransferRequest, lock_order};
pub use state::TransferState;
