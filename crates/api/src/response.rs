//! JSON envelopes returned by the data routes.

use document_store::{Document, DocumentId};
use serde::Serialize;

/// Result of a create. `insertedId` is `null` when nothing was written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    pub inserted_id: Option<DocumentId>,
}

impl CreatedResponse {
    pub fn new(message: impl Into<String>, inserted_id: Option<DocumentId>) -> Self {
        Self {
            success: true,
            message: message.into(),
            inserted_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Document>,
}

impl ListResponse {
    pub fn new(data: Vec<Document>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub data: Document,
}

impl ItemResponse {
    pub fn new(data: Document) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub success: bool,
    pub message: String,
    pub modified_count: u64,
}

impl UpdatedResponse {
    pub fn new(message: impl Into<String>, modified_count: u64) -> Self {
        Self {
            success: true,
            message: message.into(),
            modified_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}

impl DeletedResponse {
    pub fn new(message: impl Into<String>, deleted_count: u64) -> Self {
        Self {
            success: true,
            message: message.into(),
            deleted_count,
        }
    }
}

/// Body of every 404 and 500 on the data routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }
}

/// Body of `GET /users/admin/{email}`; lookup faults land in `error`.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn created_without_id_serializes_null() {
        let json = serde_json::to_value(CreatedResponse::new("User already exists", None)).unwrap();
        assert_eq!(
            json,
            json!({"success": true, "message": "User already exists", "insertedId": null})
        );
    }

    #[test]
    fn list_counts_its_data() {
        let json = serde_json::to_value(ListResponse::new(vec![Document::new(), Document::new()]))
            .unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn counts_use_camel_case() {
        let updated = serde_json::to_value(UpdatedResponse::new("ok", 1)).unwrap();
        let deleted = serde_json::to_value(DeletedResponse::new("ok", 1)).unwrap();
        assert_eq!(updated["modifiedCount"], 1);
        assert_eq!(deleted["deletedCount"], 1);
    }

    #[test]
    fn admin_without_error_omits_field() {
        let json = serde_json::to_value(AdminResponse {
            admin: false,
            error: None,
        })
        .unwrap();
        assert_eq!(json, json!({"admin": false}));
    }
}
