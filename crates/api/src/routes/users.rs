//! User endpoints: idempotent registration, admin flag and promotion.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use document_store::{Document, DocumentStore, Filter, FindOptions, ID_FIELD, Timestamp};
use serde_json::{Value, json};

use super::{CREATED_AT, parse_id};
use crate::error::{ApiError, StoreResultExt};
use crate::extract::JsonBody;
use crate::response::{
    AdminResponse, CreatedResponse, DeletedResponse, ItemResponse, ListResponse, UpdatedResponse,
};
use crate::state::Database;

pub const EMAIL_FIELD: &str = "email";
pub const ROLE_FIELD: &str = "role";
pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// GET /users/admin/{email} — whether the stored role is exactly "admin".
///
/// Always 200: a missing user reads as not admin, a lookup fault is
/// reported in the body.
#[tracing::instrument(skip(db))]
pub async fn admin_check<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(email): Path<String>,
) -> Json<AdminResponse> {
    match db.users.find_one(Filter::all().eq(EMAIL_FIELD, email)).await {
        Ok(user) => Json(AdminResponse {
            admin: user.is_some_and(|u| u.get(ROLE_FIELD).and_then(Value::as_str) == Some(ROLE_ADMIN)),
            error: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "admin check failed, reporting not admin");
            Json(AdminResponse {
                admin: false,
                error: Some(e.to_string()),
            })
        }
    }
}

/// POST /users — register a user unless one with the email exists.
///
/// The lookup and the insert are separate operations, so two concurrent
/// registrations for one email can both insert.
#[tracing::instrument(skip(db, user))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    JsonBody(mut user): JsonBody<Document>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let email = user.get(EMAIL_FIELD).cloned().unwrap_or(Value::Null);

    let existing = db
        .users
        .find_one(Filter::all().eq(EMAIL_FIELD, email))
        .await
        .or_fail("Failed to create user")?;

    if existing.is_some() {
        return Ok((
            StatusCode::OK,
            Json(CreatedResponse::new("User already exists", None)),
        ));
    }

    user.remove(ID_FIELD);
    user.insert(ROLE_FIELD.to_string(), Value::from(ROLE_USER));
    user.insert(CREATED_AT.to_string(), Timestamp::now().into());

    let result = db
        .users
        .insert_one(user)
        .await
        .or_fail("Failed to create user")?;

    tracing::info!(id = %result.inserted_id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(
            "User created successfully",
            Some(result.inserted_id),
        )),
    ))
}

/// GET /users
#[tracing::instrument(skip(db))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
) -> Result<Json<ListResponse>, ApiError> {
    let users = db
        .users
        .find(Filter::all(), FindOptions::new())
        .await
        .or_fail("Failed to fetch users")?;

    Ok(Json(ListResponse::new(users)))
}

/// GET /users/{email}
#[tracing::instrument(skip(db))]
pub async fn get_by_email<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(email): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let user = db
        .users
        .find_one(Filter::all().eq(EMAIL_FIELD, email))
        .await
        .or_fail("Failed to fetch user")?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ItemResponse::new(user)))
}

/// PUT /users/admin/{id} — set the role to admin. Idempotent.
#[tracing::instrument(skip(db))]
pub async fn make_admin<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to update user role")?;

    let mut changes = Document::new();
    changes.insert(ROLE_FIELD.to_string(), json!(ROLE_ADMIN));

    let result = db
        .users
        .update_one(Filter::by_id(id), changes)
        .await
        .or_fail("Failed to update user role")?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(%id, "user promoted to admin");
    Ok(Json(UpdatedResponse::new(
        "User role updated to admin",
        result.modified_count,
    )))
}

/// DELETE /users/{id}
#[tracing::instrument(skip(db))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    Extension(db): Extension<Database<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id).or_fail("Failed to delete user")?;

    let result = db
        .users
        .delete_one(Filter::by_id(id))
        .await
        .or_fail("Failed to delete user")?;

    if result.deleted_count == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(%id, "user deleted");
    Ok(Json(DeletedResponse::new(
        "User deleted successfully",
        result.deleted_count,
    )))
}
