use async_trait::async_trait;
use common::DocumentId;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::{
    DeleteResult, Document, DocumentStoreError, Filter, FindOptions, InsertOneResult, Result,
    UpdateResult,
    document::ID_FIELD,
    query::SortOrder,
    store::DocumentStore,
};

/// PostgreSQL-backed document store implementation.
///
/// Every document is one row of the `documents` table; the body is kept as
/// JSONB without its `_id`, which lives in the `id` column.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url` and applies the migrations.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;

        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn push_filter(query: &mut QueryBuilder<'_, Postgres>, collection: &str, filter: &Filter) {
        query.push(" WHERE collection = ");
        query.push_bind(collection.to_string());

        if let Some(id) = filter.id {
            query.push(" AND id = ");
            query.push_bind(id.to_hex());
        }

        for (field, value) in &filter.equals {
            if value.is_null() {
                // Missing keys compare equal to null
                query.push(" AND COALESCE(body -> ");
                query.push_bind(field.clone());
                query.push(", 'null'::jsonb) = 'null'::jsonb");
            } else {
                query.push(" AND body -> ");
                query.push_bind(field.clone());
                query.push(" = ");
                query.push_bind(value.clone());
            }
        }
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        let id: String = row.try_get("id")?;
        let body: Value = row.try_get("body")?;

        match body {
            Value::Object(mut document) => {
                document.insert(ID_FIELD.to_string(), Value::String(id));
                Ok(document)
            }
            other => Err(DocumentStoreError::Conversion(format!(
                "document {id} has a non-object body: {other}"
            ))),
        }
    }

    fn body_without_id(mut document: Document) -> Value {
        document.remove(ID_FIELD);
        Value::Object(document)
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult> {
        let id = DocumentId::new();

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id.to_hex())
            .bind(collection)
            .bind(Self::body_without_id(document))
            .execute(&self.pool)
            .await?;

        Ok(InsertOneResult { inserted_id: id })
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT id, body FROM documents");
        Self::push_filter(&mut query, collection, &filter);

        match options.sort {
            Some(sort) => {
                query.push(" ORDER BY body -> ");
                query.push_bind(sort.field);
                query.push(match sort.order {
                    SortOrder::Ascending => " ASC NULLS FIRST, seq ASC",
                    SortOrder::Descending => " DESC NULLS LAST, seq ASC",
                });
            }
            None => {
                query.push(" ORDER BY seq ASC");
            }
        }

        if let Some(limit) = options.limit {
            query.push(" LIMIT ");
            query.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT id, body FROM documents");
        Self::push_filter(&mut query, collection, &filter);
        query.push(" ORDER BY seq ASC LIMIT 1");

        let row = query.build().fetch_optional(&self.pool).await?;
        row.map(Self::row_to_document).transpose()
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        fields: Document,
    ) -> Result<UpdateResult> {
        let fields = Self::body_without_id(fields);

        // Lock and merge the first match in a single statement
        let mut query =
            QueryBuilder::<Postgres>::new("WITH target AS (SELECT id, body FROM documents");
        Self::push_filter(&mut query, collection, &filter);
        query.push(" ORDER BY seq ASC LIMIT 1 FOR UPDATE) ");
        query.push("UPDATE documents AS d SET body = target.body || ");
        query.push_bind(fields.clone());
        query.push(" FROM target WHERE d.id = target.id RETURNING (target.body || ");
        query.push_bind(fields);
        query.push(") IS DISTINCT FROM target.body AS modified");

        let rows = query.build().fetch_all(&self.pool).await?;

        let mut result = UpdateResult::default();
        for row in rows {
            result.matched_count += 1;
            if row.try_get::<bool, _>("modified")? {
                result.modified_count += 1;
            }
        }
        Ok(result)
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<DeleteResult> {
        let mut query = QueryBuilder::<Postgres>::new(
            "DELETE FROM documents WHERE id IN (SELECT id FROM documents",
        );
        Self::push_filter(&mut query, collection, &filter);
        query.push(" ORDER BY seq ASC LIMIT 1)");

        let outcome = query.build().execute(&self.pool).await?;
        Ok(DeleteResult {
            deleted_count: outcome.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
