use common::DocumentId;
use serde_json::Value;

use crate::document::{Document, ID_FIELD};

/// Conjunction of conditions a document must satisfy.
///
/// An empty filter matches every document in the collection. Field
/// conditions are exact equality; comparing against `null` also matches
/// documents that lack the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Match a single document by identifier.
    pub id: Option<DocumentId>,

    /// Exact-match field conditions.
    pub equals: Vec<(String, Value)>,
}

impl Filter {
    /// Creates a filter matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter for a specific identifier.
    pub fn by_id(id: DocumentId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Adds an exact-match condition on a field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push((field.into(), value.into()));
        self
    }

    /// Evaluates the filter against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(id) = self.id
            && doc.get(ID_FIELD).and_then(Value::as_str) != Some(id.to_hex().as_str())
        {
            return false;
        }

        self.equals.iter().all(|(field, expected)| match doc.get(field) {
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Options for `find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Sort by one field. Unsorted results come back in store order.
    pub sort: Option<Sort>,

    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl FindOptions {
    /// Creates options with no sort and no limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts descending by a field.
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order: SortOrder::Descending,
        });
        self
    }

    /// Limits the number of documents returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
