//! Route handlers, one module per resource.

pub mod health;
pub mod listings;
pub mod metrics;
pub mod orders;
pub mod users;

use document_store::{DocumentId, DocumentStoreError};

/// Creation timestamp field, stamped by the server.
pub const CREATED_AT: &str = "createdAt";
/// Last-update timestamp field, stamped by the server.
pub const UPDATED_AT: &str = "updatedAt";

/// Parses a path segment into the store's native identifier.
fn parse_id(id: &str) -> Result<DocumentId, DocumentStoreError> {
    Ok(DocumentId::parse_str(id)?)
}
