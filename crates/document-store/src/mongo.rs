use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument, doc};
use common::DocumentId;
use futures_util::TryStreamExt;
use mongodb::action::Find;
use mongodb::options::FindOptions as MongoFindOptions;
use mongodb::{Client, Collection, Database};
use serde_json::Value;

use crate::{
    DeleteResult, Document, DocumentStoreError, Filter, FindOptions, InsertOneResult, Result,
    UpdateResult,
    document::ID_FIELD,
    query::SortOrder,
    store::DocumentStore,
};

/// MongoDB-backed document store implementation.
///
/// Documents cross the boundary as relaxed extended JSON; `_id` is an
/// `ObjectId` in the database and a hex string on the JSON side.
#[derive(Clone)]
pub struct MongoDocumentStore {
    client: Client,
    database: Database,
}

impl MongoDocumentStore {
    /// Creates a store over an existing client.
    pub fn new(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        Self { client, database }
    }

    /// Connects to the deployment at `uri` and selects `database_name`.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(client, database_name))
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection(name)
    }
}

fn to_bson_document(document: Document) -> Result<BsonDocument> {
    match Bson::try_from(Value::Object(document))? {
        Bson::Document(converted) => Ok(converted),
        other => Err(DocumentStoreError::Conversion(format!(
            "expected a document, got {other}"
        ))),
    }
}

fn from_bson_document(mut document: BsonDocument) -> Document {
    let id = document.remove(ID_FIELD);

    let mut json = match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    };

    if let Some(id) = id {
        let id = match id {
            Bson::ObjectId(oid) => Value::String(oid.to_hex()),
            other => other.into_relaxed_extjson(),
        };
        json.insert(ID_FIELD.to_string(), id);
    }

    json
}

fn to_bson_filter(filter: &Filter) -> Result<BsonDocument> {
    let mut query = BsonDocument::new();

    if let Some(id) = filter.id {
        query.insert(ID_FIELD, id.as_object_id());
    }

    for (field, value) in &filter.equals {
        query.insert(field.clone(), Bson::try_from(value.clone())?);
    }

    Ok(query)
}

fn to_find_options(options: FindOptions) -> MongoFindOptions {
    let mut converted = MongoFindOptions::default();

    if let Some(sort) = options.sort {
        let direction = match sort.order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        // Object ids grow with insertion time, giving a stable tie-break
        let mut order = BsonDocument::new();
        order.insert(sort.field, direction);
        order.insert(ID_FIELD, 1);
        converted.sort = Some(order);
    }

    converted.limit = options
        .limit
        .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));
    converted
}

fn find_action<'a>(
    collection: &'a Collection<BsonDocument>,
    filter: &Filter,
    options: FindOptions,
) -> Result<Find<'a, BsonDocument>> {
    Ok(collection
        .find(to_bson_filter(filter)?)
        .with_options(to_find_options(options)))
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult> {
        let id = DocumentId::new();
        let mut document = to_bson_document(document)?;
        document.insert(ID_FIELD, id.as_object_id());

        self.collection(collection).insert_one(document).await?;

        Ok(InsertOneResult { inserted_id: id })
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        let coll = self.collection(collection);
        let action = find_action(&coll, &filter, options)?;

        let documents: Vec<BsonDocument> = action.await?.try_collect().await?;
        Ok(documents.into_iter().map(from_bson_document).collect())
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(to_bson_filter(&filter)?)
            .await?;
        Ok(found.map(from_bson_document))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        mut fields: Document,
    ) -> Result<UpdateResult> {
        fields.remove(ID_FIELD);

        // The server rejects an empty $set
        if fields.is_empty() {
            let matched = self.find_one(collection, filter).await?.is_some();
            return Ok(UpdateResult {
                matched_count: u64::from(matched),
                modified_count: 0,
            });
        }

        let outcome = self
            .collection(collection)
            .update_one(
                to_bson_filter(&filter)?,
                doc! { "$set": to_bson_document(fields)? },
            )
            .await?;

        Ok(UpdateResult {
            matched_count: outcome.matched_count,
            modified_count: outcome.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<DeleteResult> {
        let outcome = self
            .collection(collection)
            .delete_one(to_bson_filter(&filter)?)
            .await?;

        Ok(DeleteResult {
            deleted_count: outcome.deleted_count,
        })
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
