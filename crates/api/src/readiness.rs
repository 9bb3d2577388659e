//! Readiness guard for data routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use document_store::DocumentStore;

use crate::error::ApiError;
use crate::state::AppState;

pub const UNAVAILABLE_MESSAGE: &str = "Service unavailable: database not connected";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found";

/// Rejects the request with 503 until the store is connected; afterwards
/// hands the [`Database`](crate::state::Database) to the handler as a
/// request extension.
pub async fn require_ready<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.database() {
        Some(database) => {
            request.extensions_mut().insert(database.clone());
            next.run(request).await
        }
        None => unavailable(request.uri()),
    }
}

/// Handles paths no route matched: 503 while the store is not connected,
/// JSON 404 afterwards.
pub async fn fallback<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    uri: Uri,
) -> Response {
    if !state.is_ready() {
        return unavailable(&uri);
    }
    ApiError::NotFound(ROUTE_NOT_FOUND_MESSAGE.to_string()).into_response()
}

fn unavailable(uri: &Uri) -> Response {
    metrics::counter!("http_requests_guarded_total").increment(1);
    tracing::warn!(path = %uri.path(), "document store not connected, rejecting request");
    (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_MESSAGE).into_response()
}
