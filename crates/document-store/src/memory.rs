use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::DocumentId;
use tokio::sync::RwLock;

use crate::{
    DeleteResult, Document, Filter, FindOptions, InsertOneResult, Result, UpdateResult,
    document::{ID_FIELD, compare_values, merge_fields},
    query::SortOrder,
    store::DocumentStore,
};

/// In-memory document store implementation.
///
/// Stores every collection as a vector in insertion order and provides the
/// same interface as the database-backed implementations. Cloning shares
/// the underlying data.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Removes all documents from every collection.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertOneResult> {
        let id = DocumentId::new();
        document.insert(ID_FIELD.to_string(), id.into());

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(InsertOneResult { inserted_id: id })
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        let store = self.collections.read().await;
        let mut documents: Vec<Document> = store
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();

        // Stable sort keeps insertion order between equal keys
        if let Some(sort) = options.sort {
            documents.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = options.limit {
            documents.truncate(limit);
        }

        Ok(documents)
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>> {
        let store = self.collections.read().await;
        Ok(store
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        fields: Document,
    ) -> Result<UpdateResult> {
        let mut store = self.collections.write().await;
        let target = store
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)));

        match target {
            Some(document) => {
                let modified = merge_fields(document, &fields);
                Ok(UpdateResult {
                    matched_count: 1,
                    modified_count: u64::from(modified),
                })
            }
            None => Ok(UpdateResult::default()),
        }
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<DeleteResult> {
        let mut store = self.collections.write().await;
        let Some(docs) = store.get_mut(collection) else {
            return Ok(DeleteResult::default());
        };

        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteResult { deleted_count: 1 })
            }
            None => Ok(DeleteResult::default()),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{DocumentStoreExt, document::document_id};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_identifier() {
        let store = InMemoryDocumentStore::new();

        let result = store
            .insert_one("listings", doc(json!({"name": "Rex"})))
            .await
            .unwrap();

        let stored = store
            .find_one("listings", Filter::by_id(result.inserted_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["name"], "Rex");
        assert_eq!(document_id(&stored), Some(result.inserted_id));
    }

    #[tokio::test]
    async fn insert_replaces_client_identifier() {
        let store = InMemoryDocumentStore::new();
        let client_id = DocumentId::new();

        let result = store
            .insert_one("listings", doc(json!({"_id": client_id.to_hex()})))
            .await
            .unwrap();

        assert_ne!(result.inserted_id, client_id);
        let found = store
            .find_one("listings", Filter::by_id(client_id))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = InMemoryDocumentStore::new();
        store.insert_one("users", doc(json!({}))).await.unwrap();
        store.insert_one("orders", doc(json!({}))).await.unwrap();
        store.insert_one("orders", doc(json!({}))).await.unwrap();

        assert_eq!(store.document_count("users").await, 1);
        assert_eq!(store.document_count("orders").await, 2);
        assert_eq!(store.document_count("listings").await, 0);
    }

    #[tokio::test]
    async fn find_filters_sorts_and_limits() {
        let store = InMemoryDocumentStore::new();
        for (email, created) in [
            ("a@x.io", "2026-01-01T00:00:01.000Z"),
            ("b@x.io", "2026-01-01T00:00:02.000Z"),
            ("a@x.io", "2026-01-01T00:00:03.000Z"),
            ("a@x.io", "2026-01-01T00:00:04.000Z"),
        ] {
            store
                .insert_one("orders", doc(json!({"email": email, "createdAt": created})))
                .await
                .unwrap();
        }

        let found = store
            .find(
                "orders",
                Filter::all().eq("email", "a@x.io"),
                FindOptions::new().sort_desc("createdAt").limit(2),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0]["createdAt"], "2026-01-01T00:00:04.000Z");
        assert_eq!(found[1]["createdAt"], "2026-01-01T00:00:03.000Z");
    }

    #[tokio::test]
    async fn find_without_sort_keeps_insertion_order() {
        let store = InMemoryDocumentStore::new();
        for n in 0..3 {
            store
                .insert_one("listings", doc(json!({"n": n})))
                .await
                .unwrap();
        }

        let all = store.find_all("listings").await.unwrap();
        let ns: Vec<_> = all.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn find_on_missing_collection_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.find_all("nothing").await.unwrap().is_empty());
        assert!(
            store
                .find_one("nothing", Filter::all())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert_one("listings", doc(json!({"name": "Rex", "price": 10})))
            .await
            .unwrap()
            .inserted_id;

        let result = store
            .update_one("listings", Filter::by_id(id), doc(json!({"price": 15})))
            .await
            .unwrap();
        assert_eq!(
            result,
            UpdateResult {
                matched_count: 1,
                modified_count: 1
            }
        );

        let stored = store
            .find_one("listings", Filter::by_id(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["name"], "Rex");
        assert_eq!(stored["price"], 15);
    }

    #[tokio::test]
    async fn update_keeps_dotted_field_names_literal() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert_one("orders", doc(json!({"owner": {"email": "a@pawmart.io"}})))
            .await
            .unwrap()
            .inserted_id;

        store
            .update_one(
                "orders",
                Filter::by_id(id),
                doc(json!({"owner.email": "b@pawmart.io"})),
            )
            .await
            .unwrap();

        let stored = store
            .find_one("orders", Filter::by_id(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["owner"]["email"], "a@pawmart.io");
        assert_eq!(stored["owner.email"], "b@pawmart.io");
    }

    #[tokio::test]
    async fn update_with_same_values_matches_without_modifying() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert_one("users", doc(json!({"role": "admin"})))
            .await
            .unwrap()
            .inserted_id;

        let result = store
            .update_one("users", Filter::by_id(id), doc(json!({"role": "admin"})))
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 0);
    }

    #[tokio::test]
    async fn update_missing_document_matches_nothing() {
        let store = InMemoryDocumentStore::new();
        let result = store
            .update_one(
                "listings",
                Filter::by_id(DocumentId::new()),
                doc(json!({"x": 1})),
            )
            .await
            .unwrap();
        assert_eq!(result, UpdateResult::default());
    }

    #[tokio::test]
    async fn delete_removes_one_document() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert_one("orders", doc(json!({})))
            .await
            .unwrap()
            .inserted_id;
        store.insert_one("orders", doc(json!({}))).await.unwrap();

        let result = store
            .delete_one("orders", Filter::by_id(id))
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 1);
        assert_eq!(store.document_count("orders").await, 1);

        let again = store
            .delete_one("orders", Filter::by_id(id))
            .await
            .unwrap();
        assert_eq!(again.deleted_count, 0);
    }

    #[tokio::test]
    async fn clear_empties_all_collections() {
        let store = InMemoryDocumentStore::new();
        store.insert_one("users", doc(json!({}))).await.unwrap();
        store.clear().await;
        assert_eq!(store.document_count("users").await, 0);
    }
}
