//! Listing CRUD endpoints.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use document_store::{Document, DocumentStore, Filter, FindOptions, ID_FIELD, Timestamp};

use super::{CREATED_AT, UPDATED_AT, parse_id};
use crate::error::{ApiError, StoreResultExt};
use crate::extract::JsonBody;
use crate::response::{CreatedResponse, DeletedResponse, ItemResponse, ListResponse, UpdatedResponse};
use crate::state::Database;

/// Size of the homepage preview.
pub const RECENT_LISTINGS_LIMIT: usize = 4;

/// POST /listings — store an arbitrary listing with a creation timestamp.
#[tracing::instrument(skip(db, listing))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    JsonBody(mut listing): JsonBody<Document>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    listing.remove(ID_FIELD);
    listing.insert(CREATED_AT.to_string(), Timestamp::now().into());

    let result = db
        .listings
        .insert_one(listing)
        .await
        .or_fail("Failed to create listing")?;

    tracing::info!(id = %result.inserted_id, "listing created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(
            "Listing created successfully",
            Some(result.inserted_id),
        )),
    ))
}

/// GET /listings — every listing, in store order.
#[tracing::instrument(skip(db))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
) -> Result<Json<ListResponse>, ApiError> {
    let listings = db
        .listings
        .find(Filter::all(), FindOptions::new())
        .await
        .or_fail("Failed to fetch listings")?;

    Ok(Json(ListResponse::new(listings)))
}

/// GET /listings-recent — the newest listings for the homepage.
#[tracing::instrument(skip(db))]
pub async fn recent<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
) -> Result<Json<ListResponse>, ApiError> {
    let listings = db
        .listings
        .find(
            Filter::all(),
            FindOptions::new()
                .sort_desc(CREATED_AT)
                .limit(RECENT_LISTINGS_LIMIT),
        )
        .await
        .or_fail("Failed to fetch recent listings")?;

    Ok(Json(ListResponse::new(listings)))
}

/// GET /listings/{id}
#[tracing::instrument(skip(db))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to fetch listing")?;

    let listing = db
        .listings
        .find_one(Filter::by_id(id))
        .await
        .or_fail("Failed to fetch listing")?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?;

    Ok(Json(ItemResponse::new(listing)))
}

/// PUT /listings/{id} — merge the supplied fields into the stored listing.
#[tracing::instrument(skip(db, changes))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
    JsonBody(mut changes): JsonBody<Document>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to update listing")?;

    changes.remove(ID_FIELD);
    changes.insert(UPDATED_AT.to_string(), Timestamp::now().into());

    let result = db
        .listings
        .update_one(Filter::by_id(id), changes)
        .await
        .or_fail("Failed to update listing")?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound("Listing not found".to_string()));
    }

    Ok(Json(UpdatedResponse::new(
        "Listing updated successfully",
        result.modified_count,
    )))
}

/// DELETE /listings/{id}
#[tracing::instrument(skip(db))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to delete listing")?;

    let result = db
        .listings
        .delete_one(Filter::by_id(id))
        .await
        .or_fail("Failed to delete listing")?;

    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("Listing not found".to_string()));
    }

    tracing::info!(%id, "listing deleted");
    Ok(Json(DeletedResponse::new(
        "Listing deleted successfully",
        result.deleted_count,
    )))
}
