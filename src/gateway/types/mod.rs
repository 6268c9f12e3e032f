//! Gateway types module
//!
//! This module provides type-safe types for API boundary enforcement:
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for API input
//! - [`CreateAccountRequest`], [`CreateTransactionRequest`]: request bodies
//! - [`JsonBody`]: JSON extractor with enveloped rejections
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`AccountView`], [`TransactionView`]: response payloads

pub mod money;
pub mod request;
pub mod response;

// Re-export commonly used types at module root
pub use money::StrictDecimal;
pub use request::{CreateAccountRequest, CreateTransactionRequest, JsonBody};
pub use response::{
    AccountView, ApiError, ApiResponse, ApiResult, ErrorDetail, TransactionView, created,
    error_codes, ok,
};
