//! Typed request payloads, one per operation
//!
//! Structural checks run during deserialization, so a body that reaches the
//! dispatcher always names a usable collection and carries JSON objects where
//! the driver expects documents. Query operators themselves are not inspected.

use docbridge_common::BridgeError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Maximum collection name length accepted by the server
pub const MAX_COLLECTION_NAME_LENGTH: usize = 255;

/// A JSON object forwarded to the driver as a BSON document
pub type JsonObject = Map<String, Value>;

/// Collection name checked at the boundary
///
/// Rejects empty names, names over [`MAX_COLLECTION_NAME_LENGTH`], NUL bytes,
/// and `$`, none of which the server accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, BridgeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BridgeError::Validation(
                "Collection name cannot be empty".to_string(),
            ));
        }
        if name.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(BridgeError::Validation(format!(
                "Collection name exceeds maximum length of {} characters",
                MAX_COLLECTION_NAME_LENGTH
            )));
        }
        if name.contains('\0') {
            return Err(BridgeError::Validation(
                "Collection name cannot contain null bytes".to_string(),
            ));
        }
        if name.contains('$') {
            return Err(BridgeError::Validation(format!(
                "Collection name cannot contain '$': '{}'",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field path for `distinct`; dotted paths are allowed, operators are not
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: impl Into<String>) -> Result<Self, BridgeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BridgeError::Validation(
                "Field name cannot be empty".to_string(),
            ));
        }
        if name.contains('\0') {
            return Err(BridgeError::Validation(
                "Field name cannot contain null bytes".to_string(),
            ));
        }
        if name.starts_with('$') {
            return Err(BridgeError::Validation(format!(
                "Field name cannot start with '$': '{}'",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldName {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Cursor modifiers for `find`
///
/// Zero and absent values both mean "no restriction".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindOptions {
    #[serde(default)]
    pub sort: Option<JsonObject>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn effective_skip(&self) -> Option<u64> {
        self.skip.filter(|skip| *skip > 0)
    }

    pub fn effective_limit(&self) -> Option<i64> {
        self.limit.filter(|limit| *limit != 0)
    }
}

/// Body of `POST /query`
#[derive(Debug, Clone, Deserialize)]
pub struct FindRequest {
    pub collection: CollectionName,
    #[serde(default)]
    pub query: Option<JsonObject>,
    #[serde(default)]
    pub options: Option<FindOptions>,
}

/// Body of `POST /aggregate`
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateRequest {
    pub collection: CollectionName,
    pub pipeline: Vec<JsonObject>,
}

/// Body of `POST /count`
#[derive(Debug, Clone, Deserialize)]
pub struct CountRequest {
    pub collection: CollectionName,
    #[serde(default)]
    pub query: Option<JsonObject>,
}

/// Body of `POST /distinct`
#[derive(Debug, Clone, Deserialize)]
pub struct DistinctRequest {
    pub collection: CollectionName,
    pub field: FieldName,
    #[serde(default)]
    pub query: Option<JsonObject>,
}

/// Body of `POST /insertOne`
#[derive(Debug, Clone, Deserialize)]
pub struct InsertOneRequest {
    pub collection: CollectionName,
    pub document: JsonObject,
}

/// Body of `POST /insertMany`
#[derive(Debug, Clone, Deserialize)]
pub struct InsertManyRequest {
    pub collection: CollectionName,
    pub documents: Vec<JsonObject>,
}

/// One operation against one collection
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum OperationRequest {
    Find(FindRequest),
    Aggregate(AggregateRequest),
    Count(CountRequest),
    Distinct(DistinctRequest),
    InsertOne(InsertOneRequest),
    InsertMany(InsertManyRequest),
}

impl OperationRequest {
    /// Operation name as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            OperationRequest::Find(_) => "find",
            OperationRequest::Aggregate(_) => "aggregate",
            OperationRequest::Count(_) => "count",
            OperationRequest::Distinct(_) => "distinct",
            OperationRequest::InsertOne(_) => "insertOne",
            OperationRequest::InsertMany(_) => "insertMany",
        }
    }

    /// True for operations that insert documents
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            OperationRequest::InsertOne(_) | OperationRequest::InsertMany(_)
        )
    }

    pub fn collection(&self) -> &CollectionName {
        match self {
            OperationRequest::Find(req) => &req.collection,
            OperationRequest::Aggregate(req) => &req.collection,
            OperationRequest::Count(req) => &req.collection,
            OperationRequest::Distinct(req) => &req.collection,
            OperationRequest::InsertOne(req) => &req.collection,
            OperationRequest::InsertMany(req) => &req.collection,
        }
    }
}
