//! PawMart HTTP API.
//!
//! CRUD endpoints over the `users`, `listings` and `orders` collections of a
//! document store. All routes are registered at startup; data routes answer
//! 503 until the store connection is established in the background.

pub mod config;
pub mod error;
pub mod extract;
pub mod readiness;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use document_store::{AnyDocumentStore, DocumentStore, DocumentStoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{listings, orders, users};
use state::AppState;

/// Creates the Axum application router with all routes and shared state.
///
/// Health routes (`/`, `/health`, `/metrics`) always answer; every other
/// route goes through [`readiness::require_ready`]. Unmatched paths share
/// the 503 until the store connects.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let health_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::check::<S>));

    // Paths sharing a prefix must share the parameter name: {key} is an
    // email for GET and an identifier for PUT/DELETE.
    let data_routes = Router::new()
        .route(
            "/listings",
            post(listings::create::<S>).get(listings::list::<S>),
        )
        .route("/listings-recent", get(listings::recent::<S>))
        .route(
            "/listings/{id}",
            get(listings::get::<S>)
                .put(listings::update::<S>)
                .delete(listings::delete::<S>),
        )
        .route("/orders", post(orders::create::<S>).get(orders::list::<S>))
        .route("/orders/user/{email}", get(orders::by_owner::<S>))
        .route(
            "/orders/{id}",
            get(orders::get::<S>)
                .put(orders::update::<S>)
                .delete(orders::delete::<S>),
        )
        .route("/users", post(users::create::<S>).get(users::list::<S>))
        .route(
            "/users/admin/{key}",
            get(users::admin_check::<S>).put(users::make_admin::<S>),
        )
        .route(
            "/users/{key}",
            get(users::get_by_email::<S>).delete(users::delete::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            readiness::require_ready::<S>,
        ));

    Router::new()
        .merge(health_routes)
        .merge(data_routes)
        .fallback(readiness::fallback::<S>)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Connects to the store named by `url` and opens the readiness guard.
///
/// On failure the guard stays closed; nothing retries.
pub async fn connect_store(
    state: &AppState<AnyDocumentStore>,
    url: Option<&str>,
    database_name: &str,
) -> Result<(), DocumentStoreError> {
    let url = url.ok_or(DocumentStoreError::MissingConnectionString)?;

    let store = AnyDocumentStore::connect(url, database_name).await?;
    store.ping().await?;

    tracing::info!(
        backend = store.backend(),
        database = database_name,
        "connected to document store"
    );
    state.mark_ready(store);
    Ok(())
}
