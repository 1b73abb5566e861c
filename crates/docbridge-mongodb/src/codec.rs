//! JSON <-> BSON conversion at the HTTP boundary
//!
//! Inbound values are read as MongoDB Extended JSON, so `{"$oid": ...}` and
//! `{"$date": ...}` reach the driver as real ObjectIds and dates. Outbound
//! ObjectIds become 24-character hex strings and dates RFC 3339 strings; every
//! other value uses relaxed Extended JSON.

use bson::{Bson, Document as BsonDocument};
use docbridge_common::{BridgeError, Result};
use serde_json::{Map, Value};

/// Reject integers BSON cannot hold exactly
///
/// serde_json keeps integers above `i64::MAX` as `u64`, which the extended
/// JSON reader would otherwise turn into a lossy double.
fn check_integer_range(value: &Value) -> Result<()> {
    match value {
        Value::Number(n) if n.is_u64() && n.as_i64().is_none() => Err(BridgeError::Validation(
            format!("integer {} is out of range for a 64-bit signed integer", n),
        )),
        Value::Array(items) => items.iter().try_for_each(check_integer_range),
        Value::Object(map) => map.values().try_for_each(check_integer_range),
        _ => Ok(()),
    }
}

/// Convert a JSON object into a BSON document
pub fn object_to_document(object: Map<String, Value>) -> Result<BsonDocument> {
    let value = Value::Object(object);
    check_integer_range(&value)?;

    match Bson::try_from(value)? {
        Bson::Document(doc) => Ok(doc),
        // An object carrying a single extended-JSON key such as `$oid`
        // collapses into a scalar.
        other => Err(BridgeError::Validation(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
    }
}

/// Convert a sequence of JSON objects into BSON documents, preserving order
pub fn objects_to_documents(objects: Vec<Map<String, Value>>) -> Result<Vec<BsonDocument>> {
    objects.into_iter().map(object_to_document).collect()
}

/// Convert a BSON value into response JSON
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(formatted) => Value::String(formatted),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: BsonDocument) -> Value {
    Value::Object(
        doc.into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

pub fn documents_to_json(docs: Vec<BsonDocument>) -> Value {
    Value::Array(docs.into_iter().map(document_to_json).collect())
}
