use async_trait::async_trait;

use crate::{
    DeleteResult, Document, DocumentStoreError, Filter, FindOptions, InMemoryDocumentStore,
    InsertOneResult, MongoDocumentStore, PostgresDocumentStore, Result, UpdateResult,
    store::DocumentStore,
};

/// A document store whose backend is picked at runtime from a connection
/// string.
///
/// | Scheme | Backend |
/// |---|---|
/// | `mongodb://`, `mongodb+srv://` | [`MongoDocumentStore`] |
/// | `postgres://`, `postgresql://` | [`PostgresDocumentStore`] |
/// | `memory://` | [`InMemoryDocumentStore`] |
#[derive(Clone)]
pub enum AnyDocumentStore {
    Memory(InMemoryDocumentStore),
    Postgres(PostgresDocumentStore),
    Mongo(MongoDocumentStore),
}

impl AnyDocumentStore {
    /// Connects to the backend named by the scheme of `url`.
    ///
    /// `database_name` selects the database for backends that host several
    /// (MongoDB); the others ignore it.
    pub async fn connect(url: &str, database_name: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DocumentStoreError::MissingConnectionString);
        }

        let scheme = url.split_once("://").map_or(url, |(scheme, _)| scheme);
        match scheme {
            "mongodb" | "mongodb+srv" => Ok(Self::Mongo(
                MongoDocumentStore::connect(url, database_name).await?,
            )),
            "postgres" | "postgresql" => Ok(Self::Postgres(PostgresDocumentStore::connect(url).await?)),
            "memory" => Ok(Self::Memory(InMemoryDocumentStore::new())),
            other => Err(DocumentStoreError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Short backend name, for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
            Self::Mongo(_) => "mongodb",
        }
    }
}

#[async_trait]
impl DocumentStore for AnyDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult> {
        match self {
            Self::Memory(store) => store.insert_one(collection, document).await,
            Self::Postgres(store) => store.insert_one(collection, document).await,
            Self::Mongo(store) => store.insert_one(collection, document).await,
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        match self {
            Self::Memory(store) => store.find(collection, filter, options).await,
            Self::Postgres(store) => store.find(collection, filter, options).await,
            Self::Mongo(store) => store.find(collection, filter, options).await,
        }
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>> {
        match self {
            Self::Memory(store) => store.find_one(collection, filter).await,
            Self::Postgres(store) => store.find_one(collection, filter).await,
            Self::Mongo(store) => store.find_one(collection, filter).await,
        }
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        fields: Document,
    ) -> Result<UpdateResult> {
        match self {
            Self::Memory(store) => store.update_one(collection, filter, fields).await,
            Self::Postgres(store) => store.update_one(collection, filter, fields).await,
            Self::Mongo(store) => store.update_one(collection, filter, fields).await,
        }
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<DeleteResult> {
        match self {
            Self::Memory(store) => store.delete_one(collection, filter).await,
            Self::Postgres(store) => store.delete_one(collection, filter).await,
            Self::Mongo(store) => store.delete_one(collection, filter).await,
        }
    }

    async fn ping(&self) -> Result<()> {
        match self {
            Self::Memory(store) => store.ping().await,
            Self::Postgres(store) => store.ping().await,
            Self::Mongo(store) => store.ping().await,
        }
    }

    async fn disconnect(&self) -> Result<()> {
        match self {
            Self::Memory(store) => store.disconnect().await,
            Self::Postgres(store) => store.disconnect().await,
            Self::Mongo(store) => store.disconnect().await,
        }
    }
}
