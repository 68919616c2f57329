//! Error types for the server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::PricingError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
            ServerError::Pricing(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            ServerError::Pricing(e @ PricingError::SchemaMismatch { .. }) => {
                tracing::error!(detail = %e, "Model schema mismatch");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The features expected by the model do not match the data provided. Check the model configuration.".to_string(),
                )
            }
            ServerError::Pricing(e) => {
                tracing::error!(detail = %e, "Prediction error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Prediction failed. Check that all artifacts are available and the model is correctly configured.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Malformed or mistyped request bodies are reported like any other bad request.
impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_pricing_error_is_bad_request() {
        let err = ServerError::from(PricingError::UnknownLocation("Atlantis".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_model_error_is_internal() {
        let err = ServerError::from(PricingError::ModelError("no trees".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
