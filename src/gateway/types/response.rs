//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError`: Error half of every handler result
//! - `error_codes`: Standard error code constants
//! - Account and transaction views

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::account::Account;
use crate::core_types::{AccountId, TransactionId};
use crate::error::{ErrorKind, LedgerError};
use crate::store::StoreError;
use crate::transaction::TransactionRecord;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: payload on success, error detail on failure
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 + success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 + success envelope
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// ApiError
// ============================================================================

/// Machine-readable part of an error envelope
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable error name, e.g. `INSUFFICIENT_BALANCE`
    #[schema(example = "INSUFFICIENT_BALANCE")]
    pub error: String,
    /// Id of the `failed` record written for an insufficient balance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
    pub detail: Option<ErrorDetail>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
            detail: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
            .with_error("INVALID_PARAMETER")
    }

    fn with_error(mut self, error: &str) -> Self {
        self.detail = Some(ErrorDetail {
            error: error.to_string(),
            transaction_id: None,
        });
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            code: self.code,
            msg: self.msg,
            data: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        if e.kind() == ErrorKind::StoreFailure {
            // Detail stays in the log; callers get an opaque message
            tracing::error!(error = %e, code = e.code(), "request failed in ledger store");
        }
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let transaction_id = match &e {
            LedgerError::InsufficientBalance { transaction_id, .. } => Some(*transaction_id),
            _ => None,
        };
        Self {
            status,
            code: error_codes::for_error(&e),
            msg: e.public_message(),
            detail: Some(ErrorDetail {
                error: e.code().to_string(),
                transaction_id,
            }),
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Account view
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountView {
    #[schema(example = 1)]
    pub account_id: AccountId,
    /// Exact decimal as string
    #[schema(example = "100.00")]
    pub balance: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            balance: account.balance.to_string(),
        }
    }
}

/// Transaction view
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionView {
    #[schema(example = 1)]
    pub transaction_id: TransactionId,
    #[schema(example = 1)]
    pub source_account_id: AccountId,
    #[schema(example = 2)]
    pub destination_account_id: AccountId,
    /// Exact decimal as string
    #[schema(example = "30.00")]
    pub amount: String,
    /// `completed`, `failed` or `pending`
    #[schema(example = "completed")]
    pub status: String,
    #[schema(value_type = String, example = "2026-01-01T00:00:00Z")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<TransactionRecord> for TransactionView {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            source_account_id: record.source_account_id,
            destination_account_id: record.destination_account_id,
            amount: record.amount.to_string(),
            status: record.status.to_string(),
            created_at: record.created_at,
            error_message: record.error_message,
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    use super::{LedgerError, StoreError};

    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const INVALID_AMOUNT: i32 = 1003;
    pub const SELF_TRANSFER: i32 = 1004;
    pub const INVALID_ACCOUNT_ID: i32 = 1005;
    pub const NEGATIVE_BALANCE: i32 = 1006;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const TRANSACTION_NOT_FOUND: i32 = 4002;
    pub const ACCOUNT_EXISTS: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;

    /// Envelope code for a ledger error
    pub fn for_error(e: &LedgerError) -> i32 {
        match e {
            LedgerError::InvalidAmount(_) => INVALID_AMOUNT,
            LedgerError::SelfTransfer(_) => SELF_TRANSFER,
            LedgerError::InvalidAccountId { .. } => INVALID_ACCOUNT_ID,
            LedgerError::NegativeBalance(_) => NEGATIVE_BALANCE,
            LedgerError::AccountNotFound(_) => ACCOUNT_NOT_FOUND,
            LedgerError::TransactionNotFound(_) => TRANSACTION_NOT_FOUND,
            LedgerError::AccountExists(_) => ACCOUNT_EXISTS,
            LedgerError::InsufficientBalance { .. } => INSUFFICIENT_BALANCE,
            LedgerError::Store(StoreError::Unavailable(_)) => SERVICE_UNAVAILABLE,
            LedgerError::Store(_) | LedgerError::Overflow(_) | LedgerError::PrecisionLoss(_) => {
                INTERNAL_ERROR
            }
        }
    }
}
