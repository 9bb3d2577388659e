use common::InvalidDocumentId;
use thiserror::Error;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// An identifier could not be parsed into the store's native type.
    #[error(transparent)]
    InvalidId(#[from] InvalidDocumentId),

    /// A PostgreSQL error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A MongoDB driver error occurred.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A document could not be converted between JSON and the backend's format.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection string names a backend this crate doesn't support.
    #[error("Unsupported connection string scheme: {0}")]
    UnsupportedScheme(String),

    /// No connection string was configured.
    #[error("No database connection string configured")]
    MissingConnectionString,
}

impl From<bson::extjson::de::Error> for DocumentStoreError {
    fn from(err: bson::extjson::de::Error) -> Self {
        DocumentStoreError::Conversion(err.to_string())
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, DocumentStoreError>;
