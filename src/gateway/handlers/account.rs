//! Account handlers

use std::sync::Arc;

use axum::extract::{Path, State};

use super::super::state::AppState;
use super::super::types::{
    AccountView, ApiError, ApiResult, CreateAccountRequest, JsonBody, created, ok,
};
use crate::core_types::AccountId;

/// Create account endpoint
///
/// POST /accounts
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView, content_type = "application/json"),
        (status = 400, description = "Invalid account id or negative balance"),
        (status = 409, description = "Account id already in use"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateAccountRequest>,
) -> ApiResult<AccountView> {
    let account = state.accounts.create_account(req.into()).await?;
    created(account.into())
}

/// Get account endpoint
///
/// GET /accounts/{account_id}
#[utoipa::path(
    get,
    path = "/accounts/{account_id}",
    params(
        ("account_id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account balance", body = AccountView, content_type = "application/json"),
        (status = 400, description = "Invalid account id"),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<AccountView> {
    let account_id: AccountId = account_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid account ID format"))?;

    let account = state.accounts.get_account(account_id).await?;
    ok(account.into())
}
