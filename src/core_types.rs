//! Core identifier types shared by every ledger module.
//!
//! Both identifiers are signed 64-bit to match the PostgreSQL `BIGINT`
//! columns they are stored in. Validity (strictly positive) is checked by
//! the services, not by the type.

/// Account identifier, chosen by the caller at account creation.
pub type AccountId = i64;

/// Transaction record identifier, assigned sequentially by the store.
pub type TransactionId = i64;
