//! MongoDB side of docbridge
//!
//! This crate owns the single reused database handle and translates typed
//! request payloads into driver calls.
//!
//! # Features
//! - Lazily established, process-wide connection with one-shot activation
//! - Typed payloads for find, aggregate, count, distinct, insertOne, insertMany
//! - Extended JSON input, plain JSON output
//! - Health and diagnostic probes that report degradation instead of failing

pub mod codec;
pub mod connection;
pub mod diagnostics;
pub mod dispatcher;
pub mod request;

pub use connection::{
    mask_uri, Connection, ConnectionConfig, ConnectionManager, Connector, MongoConnector,
    PoolConfig, DEFAULT_DATABASE,
};
pub use diagnostics::{diagnose, health, DiagnosticReport, EnvironmentInfo, HealthReport, HealthStatus};
pub use dispatcher::{Dispatcher, InsertManyAck, InsertOneAck, OperationOutput};
pub use docbridge_common::{BridgeError, Result};
pub use request::{
    AggregateRequest, CollectionName, CountRequest, DistinctRequest, FieldName, FindOptions,
    FindRequest, InsertManyRequest, InsertOneRequest, OperationRequest,
};
