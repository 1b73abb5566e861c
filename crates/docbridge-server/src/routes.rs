//! HTTP routes
//!
//! One POST endpoint per operation plus the `/health` and `/diagnose` probes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{FromRequest, Request, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use docbridge_common::BridgeError;
use docbridge_mongodb::{
    diagnostics, AggregateRequest, CountRequest, DistinctRequest, EnvironmentInfo, FindRequest,
    InsertManyRequest, InsertOneRequest, OperationRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// JSON body extractor whose rejection uses the gateway's error body
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diagnose", get(diagnose))
        .route("/query", post(query))
        .route("/aggregate", post(aggregate))
        .route("/count", post(count))
        .route("/distinct", post(distinct))
        .route("/insertOne", post(insert_one))
        .route("/insertMany", post(insert_many))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<diagnostics::HealthReport> {
    let report = diagnostics::health(
        state.dispatcher.connection(),
        state.config.health_collection.as_deref(),
    )
    .await;
    Json(report)
}

async fn diagnose(State(state): State<AppState>) -> Json<diagnostics::DiagnosticReport> {
    let environment = EnvironmentInfo {
        mongodb_uri: state.config.connection.masked_uri(),
        database: state.config.connection.database.clone(),
        port: state.config.port,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let report = diagnostics::diagnose(state.dispatcher.connection(), environment).await;
    Json(report)
}

/// Dispatch one operation and render its result
///
/// Read operations report failures with `{error, code, details}`; inserts with
/// `{error}`.
async fn run(state: &AppState, request: OperationRequest) -> Result<Json<Value>, ApiError> {
    let op = request.name();
    let collection = request.collection().clone();
    let into_api_error: fn(BridgeError) -> ApiError = if request.is_write() {
        ApiError::plain
    } else {
        ApiError::detailed
    };

    let output = state.dispatcher.execute(request).await.map_err(|e| {
        error!(op, %collection, error = %e, "Operation failed");
        into_api_error(e)
    })?;
    Ok(Json(output.into_json()))
}

async fn query(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<FindRequest>,
) -> Result<Json<Value>, ApiError> {
    run(&state, OperationRequest::Find(req)).await
}

async fn aggregate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AggregateRequest>,
) -> Result<Json<Value>, ApiError> {
    run(&state, OperationRequest::Aggregate(req)).await
}

async fn count(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CountRequest>,
) -> Result<Json<Value>, ApiError> {
    run(&state, OperationRequest::Count(req)).await
}

async fn distinct(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DistinctRequest>,
) -> Result<Json<Value>, ApiError> {
    run(&state, OperationRequest::Distinct(req)).await
}

async fn insert_one(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<InsertOneRequest>,
) -> Result<Json<Value>, ApiError> {
    run(&state, OperationRequest::InsertOne(req)).await
}

async fn insert_many(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<InsertManyRequest>,
) -> Result<Json<Value>, ApiError> {
    run(&state, OperationRequest::InsertMany(req)).await
}
