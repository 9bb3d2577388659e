//! Health check endpoints. Never gated by the readiness guard.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use document_store::DocumentStore;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET / — plain-text liveness message.
pub async fn root() -> &'static str {
    "PawMart Server is Running"
}

/// GET /health — process status plus whether the store is connected.
pub async fn check<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: if state.is_ready() {
            "connected"
        } else {
            "unavailable"
        },
    })
}
