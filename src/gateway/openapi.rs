//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    AccountView, CreateAccountRequest, CreateTransactionRequest, ErrorDetail, TransactionView,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Internal Transfers API",
        version = "1.0.0",
        description = "Account ledger with atomic internal transfers between accounts.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_account,
        crate::gateway::handlers::get_account,
        crate::gateway::handlers::create_transaction,
        crate::gateway::handlers::get_transaction,
    ),
    components(
        schemas(
            HealthResponse,
            AccountView,
            TransactionView,
            CreateAccountRequest,
            CreateTransactionRequest,
            ErrorDetail,
        )
    ),
    tags(
        (name = "Account", description = "Account creation and balance queries"),
        (name = "Transfer", description = "Internal fund transfers and their records"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Internal Transfers API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let json = ApiDoc::openapi().to_json();
        assert!(json.is_ok());
        assert!(json.unwrap().contains("Internal Transfers API"));
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths;
        assert!(paths.paths.contains_key("/health"));
        assert!(paths.paths.contains_key("/accounts"));
        assert!(paths.paths.contains_key("/accounts/{account_id}"));
        assert!(paths.paths.contains_key("/transactions"));
        assert!(paths.paths.contains_key("/transactions/{transaction_id}"));
    }
}
