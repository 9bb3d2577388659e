//! Document store client for the PawMart backend.
//!
//! A [`DocumentStore`] holds named collections of schema-less JSON documents
//! and offers single-document insert, find, merge-update and delete. Three
//! backends implement it: in-memory, PostgreSQL (JSONB rows) and MongoDB.
//! [`AnyDocumentStore`] picks one from a connection string.

pub mod any;
pub mod collection;
pub mod document;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod postgres;
pub mod query;
pub mod store;

pub use any::AnyDocumentStore;
pub use collection::Collection;
pub use common::{DocumentId, Timestamp};
pub use document::{DeleteResult, Document, ID_FIELD, InsertOneResult, UpdateResult};
pub use error::{DocumentStoreError, Result};
pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use query::{Filter, FindOptions, Sort, SortOrder};
pub use store::{DocumentStore, DocumentStoreExt};
