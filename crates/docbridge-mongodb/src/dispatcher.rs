//! Operation dispatcher
//!
//! Each operation activates the shared connection, converts its payload to
//! BSON, issues exactly one driver call against the named collection, and
//! returns the driver's result. Errors are returned, never retried.

use crate::codec::{self, bson_to_json};
use crate::connection::ConnectionManager;
use crate::request::{
    AggregateRequest, CollectionName, CountRequest, DistinctRequest, FindRequest,
    InsertManyRequest, InsertOneRequest, OperationRequest,
};
use bson::{Bson, Document as BsonDocument};
use docbridge_common::Result;
use futures::TryStreamExt;
use mongodb::Collection;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Acknowledgement for a single-document insert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneAck {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

/// Acknowledgement for a bulk insert
///
/// `inserted_ids` is keyed by the position of each document in the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyAck {
    pub acknowledged: bool,
    pub inserted_count: usize,
    pub inserted_ids: BTreeMap<usize, Value>,
}

/// Result of one dispatched operation
#[derive(Debug, Clone)]
pub enum OperationOutput {
    Documents(Vec<BsonDocument>),
    Count(u64),
    Values(Vec<Bson>),
    InsertedOne(InsertOneAck),
    InsertedMany(InsertManyAck),
}

impl OperationOutput {
    /// Response body for this result
    pub fn into_json(self) -> Value {
        match self {
            OperationOutput::Documents(docs) => codec::documents_to_json(docs),
            OperationOutput::Count(count) => serde_json::json!({ "count": count }),
            OperationOutput::Values(values) => {
                Value::Array(values.into_iter().map(bson_to_json).collect())
            }
            OperationOutput::InsertedOne(ack) => serde_json::json!({
                "acknowledged": ack.acknowledged,
                "insertedId": ack.inserted_id,
            }),
            OperationOutput::InsertedMany(ack) => serde_json::json!({
                "acknowledged": ack.acknowledged,
                "insertedCount": ack.inserted_count,
                "insertedIds": ack.inserted_ids,
            }),
        }
    }
}

/// Translates typed requests into driver calls over the shared connection
#[derive(Clone)]
pub struct Dispatcher {
    connection: Arc<ConnectionManager>,
}

impl Dispatcher {
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    async fn collection(&self, name: &CollectionName) -> Result<Collection<BsonDocument>> {
        Ok(self.connection.ensure_connected().await?.collection(name.as_str()))
    }

    /// Run whichever operation the request names
    pub async fn execute(&self, request: OperationRequest) -> Result<OperationOutput> {
        debug!(
            op = request.name(),
            collection = %request.collection(),
            "Dispatching operation"
        );
        match request {
            OperationRequest::Find(req) => self.find(req).await.map(OperationOutput::Documents),
            OperationRequest::Aggregate(req) => {
                self.aggregate(req).await.map(OperationOutput::Documents)
            }
            OperationRequest::Count(req) => self.count(req).await.map(OperationOutput::Count),
            OperationRequest::Distinct(req) => {
                self.distinct(req).await.map(OperationOutput::Values)
            }
            OperationRequest::InsertOne(req) => {
                self.insert_one(req).await.map(OperationOutput::InsertedOne)
            }
            OperationRequest::InsertMany(req) => {
                self.insert_many(req).await.map(OperationOutput::InsertedMany)
            }
        }
    }

    /// Find matching documents; the cursor is drained into memory
    pub async fn find(&self, req: FindRequest) -> Result<Vec<BsonDocument>> {
        let collection = self.collection(&req.collection).await?;
        let filter = codec::object_to_document(req.query.unwrap_or_default())?;

        let mut action = collection.find(filter);
        if let Some(options) = req.options {
            if let Some(skip) = options.effective_skip() {
                action = action.skip(skip);
            }
            if let Some(limit) = options.effective_limit() {
                action = action.limit(limit);
            }
            if let Some(sort) = options.sort {
                action = action.sort(codec::object_to_document(sort)?);
            }
        }

        let cursor = action.await?;
        let docs: Vec<BsonDocument> = cursor.try_collect().await?;
        Ok(docs)
    }

    /// Run an aggregation pipeline; stages are forwarded uninterpreted
    pub async fn aggregate(&self, req: AggregateRequest) -> Result<Vec<BsonDocument>> {
        let collection = self.collection(&req.collection).await?;
        let pipeline = codec::objects_to_documents(req.pipeline)?;

        let cursor = collection.aggregate(pipeline).await?;
        let docs: Vec<BsonDocument> = cursor.try_collect().await?;
        Ok(docs)
    }

    /// Count documents matching the filter
    pub async fn count(&self, req: CountRequest) -> Result<u64> {
        let collection = self.collection(&req.collection).await?;
        let filter = codec::object_to_document(req.query.unwrap_or_default())?;

        let count = collection.count_documents(filter).await?;
        Ok(count)
    }

    /// Distinct values of a field among matching documents
    pub async fn distinct(&self, req: DistinctRequest) -> Result<Vec<Bson>> {
        let collection = self.collection(&req.collection).await?;
        let filter = codec::object_to_document(req.query.unwrap_or_default())?;

        let values = collection.distinct(req.field.as_str(), filter).await?;
        Ok(values)
    }

    pub async fn insert_one(&self, req: InsertOneRequest) -> Result<InsertOneAck> {
        let collection = self.collection(&req.collection).await?;
        let document = codec::object_to_document(req.document)?;

        let result = collection.insert_one(document).await?;
        Ok(InsertOneAck {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        })
    }

    /// Bulk insert with the driver's default ordered semantics
    pub async fn insert_many(&self, req: InsertManyRequest) -> Result<InsertManyAck> {
        let collection = self.collection(&req.collection).await?;
        let documents = codec::objects_to_documents(req.documents)?;

        let result = collection.insert_many(documents).await?;
        let inserted_ids: BTreeMap<usize, Value> = result
            .inserted_ids
            .into_iter()
            .map(|(index, id)| (index, bson_to_json(id)))
            .collect();

        Ok(InsertManyAck {
            acknowledged: true,
            inserted_count: inserted_ids.len(),
            inserted_ids,
        })
    }
}
