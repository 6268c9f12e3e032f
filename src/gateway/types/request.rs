//! Request bodies and the JSON extractor that wraps their rejections

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use utoipa::ToSchema;

use super::money::StrictDecimal;
use super::response::ApiError;
use crate::account::NewAccount;
use crate::core_types::AccountId;
use crate::transfer::TransferRequest;

/// Create-account body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = 1)]
    pub account_id: AccountId,
    /// Exact decimal as string
    #[schema(value_type = String, example = "100.00")]
    pub initial_balance: StrictDecimal,
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(req: CreateAccountRequest) -> Self {
        NewAccount::new(req.account_id, req.initial_balance.inner())
    }
}

/// Create-transfer body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    #[schema(example = 1)]
    pub source_account_id: AccountId,
    #[schema(example = 2)]
    pub destination_account_id: AccountId,
    /// Exact decimal as string
    #[schema(value_type = String, example = "30.00")]
    pub amount: StrictDecimal,
}

impl From<CreateTransactionRequest> for TransferRequest {
    fn from(req: CreateTransactionRequest) -> Self {
        TransferRequest::new(
            req.source_account_id,
            req.destination_account_id,
            req.amount.inner(),
        )
    }
}

/// `Json<T>` whose rejection is an enveloped 400
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;
        Ok(JsonBody(value))
    }
}
