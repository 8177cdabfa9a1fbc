//! HTTP error mapping for the minting endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mintgate::MintError;

/// Errors surfaced by the mint handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A minting flow failed; the status code follows the error's
    /// taxonomy.
    #[error(transparent)]
    Mint(#[from] MintError),

    /// The custodial path was requested but is not configured.
    #[error("custodial minting is not enabled on this server")]
    CustodialDisabled,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Mint(err) => match err {
                MintError::Validation(_) => StatusCode::BAD_REQUEST,
                MintError::AuthorizationRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                MintError::Network(_) | MintError::UnexpectedResponse(_) => StatusCode::BAD_GATEWAY,
                MintError::Derivation(_) | MintError::Signing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::CustodialDisabled => StatusCode::NOT_FOUND,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
