//! API error types with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use document_store::DocumentStoreError;

use crate::response::ErrorResponse;

pub const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object";

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// No document matched the identifier or email.
    NotFound(String),
    /// The body was not a JSON object or lacked the JSON content type.
    InvalidBody(JsonRejection),
    /// The store failed; `message` says which operation.
    Store {
        message: String,
        source: DocumentStoreError,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(message, None)),
            )
                .into_response(),
            ApiError::InvalidBody(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "rejected request body");
                (
                    rejection.status(),
                    Json(ErrorResponse::new(
                        INVALID_BODY_MESSAGE,
                        Some(rejection.body_text()),
                    )),
                )
                    .into_response()
            }
            ApiError::Store { message, source } => {
                tracing::error!(error = %source, "{message}");
                // The fault text is passed through verbatim
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(message, Some(source.to_string()))),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

/// Attaches a handler-specific message to store results.
pub trait StoreResultExt<T> {
    fn or_fail(self, message: &str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for document_store::Result<T> {
    fn or_fail(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|source| ApiError::Store {
            message: message.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use document_store::DocumentId;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404_without_error_field() {
        let response = ApiError::NotFound("Listing not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Listing not found");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn store_fault_is_500_with_verbatim_error() {
        let source = DocumentId::parse_str("bogus").unwrap_err();
        let expected = source.to_string();

        let result: document_store::Result<()> = Err(source.into());
        let response = result
            .or_fail("Failed to fetch listing")
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to fetch listing");
        assert_eq!(json["error"], expected);
    }
}
