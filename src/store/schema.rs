//! PostgreSQL schema for the ledger
//!
//! Constraint names are referenced by the in-memory store so both
//! backends report the same violations.

use sqlx::PgPool;

use super::StoreError;

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    account_id  BIGINT      NOT NULL,
    balance     NUMERIC     NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT accounts_pkey PRIMARY KEY (account_id),
    CONSTRAINT accounts_account_id_check CHECK (account_id > 0),
    CONSTRAINT accounts_balance_check CHECK (balance >= 0)
)
"#;

pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id          BIGSERIAL   NOT NULL,
    source_account_id       BIGINT      NOT NULL REFERENCES accounts (account_id),
    destination_account_id  BIGINT      NOT NULL REFERENCES accounts (account_id),
    amount                  NUMERIC     NOT NULL,
    status                  TEXT        NOT NULL,
    created_at              TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    error_message           TEXT,
    CONSTRAINT transactions_pkey PRIMARY KEY (transaction_id),
    CONSTRAINT transactions_amount_check CHECK (amount > 0),
    CONSTRAINT transactions_distinct_accounts_check
        CHECK (source_account_id <> destination_account_id),
    CONSTRAINT transactions_status_check
        CHECK (status IN ('completed', 'failed', 'pending')),
    CONSTRAINT transactions_failed_message_check
        CHECK (status <> 'failed' OR (error_message IS NOT NULL AND error_message <> ''))
)
"#;

pub const CREATE_TRANSACTIONS_SOURCE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_source
    ON transactions (source_account_id, created_at)
"#;

pub const CREATE_TRANSACTIONS_DESTINATION_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_destination
    ON transactions (destination_account_id, created_at)
"#;

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("Initializing ledger schema...");

    for (name, ddl) in [
        ("accounts", CREATE_ACCOUNTS_TABLE),
        ("transactions", CREATE_TRANSACTIONS_TABLE),
        ("idx_transactions_source", CREATE_TRANSACTIONS_SOURCE_INDEX),
        (
            "idx_transactions_destination",
            CREATE_TRANSACTIONS_DESTINATION_INDEX,
        ),
    ] {
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            tracing::error!(object = name, error = %e, "Failed to create schema object");
            StoreError::from(e)
        })?;
    }

    tracing::info!("Ledger schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_enforces_ledger_invariants() {
        assert!(CREATE_ACCOUNTS_TABLE.contains("CHECK (balance >= 0)"));
        assert!(CREATE_TRANSACTIONS_TABLE.contains("CHECK (amount > 0)"));
        assert!(CREATE_TRANSACTIONS_TABLE.contains("source_account_id <> destination_account_id"));
        assert!(CREATE_TRANSACTIONS_TABLE.contains("status <> 'failed' OR"));
    }

    #[test]
    fn test_schema_is_idempotent() {
        for ddl in [
            CREATE_ACCOUNTS_TABLE,
            CREATE_TRANSACTIONS_TABLE,
            CREATE_TRANSACTIONS_SOURCE_INDEX,
            CREATE_TRANSACTIONS_DESTINATION_INDEX,
        ] {
            assert!(ddl.contains("IF NOT EXISTS"));
        }
    }
}
