use std::time::Instant;

use crate::{
    DeleteResult, Document, Filter, FindOptions, InsertOneResult, Result, UpdateResult,
    store::DocumentStore,
};

/// Handle to one named collection of a store.
///
/// Cheap to clone when the store is. Every operation is recorded in the
/// `document_store_operations_total` counter and the
/// `document_store_operation_duration_seconds` histogram, labelled by
/// collection and operation.
#[derive(Clone)]
pub struct Collection<S> {
    store: S,
    name: &'static str,
}

impl<S: DocumentStore> Collection<S> {
    /// Creates a handle to `name` on `store`.
    pub fn new(store: S, name: &'static str) -> Self {
        Self { store, name }
    }

    /// The collection name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn insert_one(&self, document: Document) -> Result<InsertOneResult> {
        let started = Instant::now();
        let result = self.store.insert_one(self.name, document).await;
        self.record("insert_one", started, result.is_ok());
        result
    }

    pub async fn find(&self, filter: Filter, options: FindOptions) -> Result<Vec<Document>> {
        let started = Instant::now();
        let result = self.store.find(self.name, filter, options).await;
        self.record("find", started, result.is_ok());
        result
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<Document>> {
        let started = Instant::now();
        let result = self.store.find_one(self.name, filter).await;
        self.record("find_one", started, result.is_ok());
        result
    }

    pub async fn update_one(&self, filter: Filter, fields: Document) -> Result<UpdateResult> {
        let started = Instant::now();
        let result = self.store.update_one(self.name, filter, fields).await;
        self.record("update_one", started, result.is_ok());
        result
    }

    pub async fn delete_one(&self, filter: Filter) -> Result<DeleteResult> {
        let started = Instant::now();
        let result = self.store.delete_one(self.name, filter).await;
        self.record("delete_one", started, result.is_ok());
        result
    }

    fn record(&self, operation: &'static str, started: Instant, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        metrics::counter!(
            "document_store_operations_total",
            "collection" => self.name,
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(
            "document_store_operation_duration_seconds",
            "collection" => self.name,
            "operation" => operation
        )
        .record(started.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::InMemoryDocumentStore;

    #[tokio::test]
    async fn operations_target_the_named_collection() {
        let store = InMemoryDocumentStore::new();
        let listings = Collection::new(store.clone(), "listings");

        let mut document = Document::new();
        document.insert("name".to_string(), json!("Rex"));
        let id = listings.insert_one(document).await.unwrap().inserted_id;

        assert_eq!(listings.name(), "listings");
        assert_eq!(store.document_count("listings").await, 1);
        assert!(listings.find_one(Filter::by_id(id)).await.unwrap().is_some());

        let deleted = listings.delete_one(Filter::by_id(id)).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);
        assert_eq!(store.document_count("listings").await, 0);
    }
}
