//! Order CRUD endpoints.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use document_store::{Document, DocumentStore, Filter, FindOptions, ID_FIELD, Timestamp};
use serde_json::Value;

use super::{CREATED_AT, UPDATED_AT, parse_id};
use crate::error::{ApiError, StoreResultExt};
use crate::extract::JsonBody;
use crate::response::{CreatedResponse, DeletedResponse, ItemResponse, ListResponse, UpdatedResponse};
use crate::state::Database;

/// Status every new order starts in, whatever the client sent.
pub const INITIAL_STATUS: &str = "pending";

/// Field holding the buyer's email.
pub const OWNER_FIELD: &str = "email";

/// POST /orders — store an order with status forced to pending.
#[tracing::instrument(skip(db, order))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    JsonBody(mut order): JsonBody<Document>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    order.remove(ID_FIELD);
    order.insert("status".to_string(), Value::from(INITIAL_STATUS));
    order.insert(CREATED_AT.to_string(), Timestamp::now().into());

    let result = db
        .orders
        .insert_one(order)
        .await
        .or_fail("Failed to create order")?;

    tracing::info!(id = %result.inserted_id, "order created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(
            "Order created successfully",
            Some(result.inserted_id),
        )),
    ))
}

/// GET /orders — every order, newest first.
#[tracing::instrument(skip(db))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
) -> Result<Json<ListResponse>, ApiError> {
    let orders = db
        .orders
        .find(Filter::all(), FindOptions::new().sort_desc(CREATED_AT))
        .await
        .or_fail("Failed to fetch orders")?;

    Ok(Json(ListResponse::new(orders)))
}

/// GET /orders/user/{email} — one buyer's orders, newest first.
#[tracing::instrument(skip(db))]
pub async fn by_owner<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(email): Path<String>,
) -> Result<Json<ListResponse>, ApiError> {
    let orders = db
        .orders
        .find(
            Filter::all().eq(OWNER_FIELD, email),
            FindOptions::new().sort_desc(CREATED_AT),
        )
        .await
        .or_fail("Failed to fetch user orders")?;

    Ok(Json(ListResponse::new(orders)))
}

/// GET /orders/{id}
#[tracing::instrument(skip(db))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to fetch order")?;

    let order = db
        .orders
        .find_one(Filter::by_id(id))
        .await
        .or_fail("Failed to fetch order")?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(ItemResponse::new(order)))
}

/// PUT /orders/{id} — merge the supplied fields, status included.
#[tracing::instrument(skip(db, changes))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
    JsonBody(mut changes): JsonBody<Document>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to update order")?;

    changes.remove(ID_FIELD);
    changes.insert(UPDATED_AT.to_string(), Timestamp::now().into());

    let result = db
        .orders
        .update_one(Filter::by_id(id), changes)
        .await
        .or_fail("Failed to update order")?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    Ok(Json(UpdatedResponse::new(
        "Order updated successfully",
        result.modified_count,
    )))
}

/// DELETE /orders/{id}
#[tracing::instrument(skip(db))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to delete order")?;

    let result = db
        .orders
        .delete_one(Filter::by_id(id))
        .await
        .or_fail("Failed to delete order")?;

    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    tracing::info!(%id, "order deleted");
    Ok(Json(DeletedResponse::new(
        "Order deleted successfully",
        result.deleted_count,
    )))
}
