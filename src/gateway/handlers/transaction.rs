//! Transaction handlers (transfers and their records)

use std::sync::Arc;

use axum::extract::{Path, State};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateTransactionRequest, JsonBody, TransactionView, created, ok,
};
use crate::core_types::TransactionId;

/// Create transfer endpoint
///
/// POST /transactions
///
/// An insufficient balance answers 422 and still records a `failed`
/// transaction; its id is returned in `data.transaction_id`.
#[utoipa::path(
    post,
    path = "/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transfer completed", body = TransactionView, content_type = "application/json"),
        (status = 400, description = "Invalid amount, account id or self-transfer"),
        (status = 404, description = "Source or destination account not found"),
        (status = 422, description = "Insufficient balance, failed transaction recorded"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "Transfer"
)]
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTransactionRequest>,
) -> ApiResult<TransactionView> {
    let req = crate::transfer::TransferRequest::from(req);
    let record = state
        .transfers
        .execute_transfer(req.source_account_id, req.destination_account_id, req.amount)
        .await?;
    created(record.into())
}

/// Get transaction endpoint
///
/// GET /transactions/{transaction_id}
#[utoipa::path(
    get,
    path = "/transactions/{transaction_id}",
    params(
        ("transaction_id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction record", body = TransactionView, content_type = "application/json"),
        (status = 400, description = "Invalid transaction id format"),
        (status = 404, description = "Transaction not found"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "Transfer"
)]
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> ApiResult<TransactionView> {
    let transaction_id: TransactionId = transaction_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid transaction ID format"))?;

    let record = state.transactions.get_by_id(transaction_id).await?;
    ok(record.into())
}
