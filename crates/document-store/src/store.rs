use async_trait::async_trait;

use crate::{DeleteResult, Document, Filter, FindOptions, InsertOneResult, Result, UpdateResult};

/// Core trait for document store implementations.
///
/// A document store holds named collections of schema-less documents.
/// Every single-document write is atomic; nothing spans documents.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document into a collection.
    ///
    /// The store always assigns a fresh identifier; an `_id` present in the
    /// input is replaced.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult>;

    /// Retrieves every document matching the filter.
    ///
    /// Without a sort, documents come back in insertion order.
    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>>;

    /// Retrieves the first document matching the filter.
    async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>>;

    /// Merges `fields` into the first document matching the filter.
    ///
    /// Only the keys present in `fields` are overwritten; `_id` is never
    /// changed.
    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        fields: Document,
    ) -> Result<UpdateResult>;

    /// Deletes the first document matching the filter.
    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<DeleteResult>;

    /// Verifies that the backend is reachable.
    async fn ping(&self) -> Result<()>;

    /// Releases the underlying connection. The store must not be used after.
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

/// Extension trait providing convenience methods for document stores.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Retrieves every document of a collection in store order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.find(collection, Filter::all(), FindOptions::new()).await
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}
