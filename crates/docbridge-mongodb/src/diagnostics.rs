//! Health and diagnostic probes
//!
//! Probes never fail the caller: every failure is captured into the report.

use crate::connection::ConnectionManager;
use bson::doc;
use docbridge_common::{BridgeError, Result};
use serde::Serialize;
use std::future::Future;
use std::time::Instant;
use tracing::warn;

/// Overall status reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub connected: bool,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_error: Option<String>,
}

/// Activate, ping, and optionally count one collection
pub async fn health(manager: &ConnectionManager, health_collection: Option<&str>) -> HealthReport {
    let mut report = HealthReport {
        status: HealthStatus::Ok,
        connected: manager.is_connected(),
        database: manager.database_name().to_string(),
        ping: None,
        test_collection: None,
        document_count: None,
        ping_error: None,
    };

    let outcome = async {
        let connection = manager.ensure_connected().await?;
        connection.ping().await?;
        report.ping = Some("ok");

        if let Some(name) = health_collection {
            report.test_collection = Some(name.to_string());
            let count = connection.collection(name).count_documents(doc! {}).await?;
            report.document_count = Some(count);
        }
        Ok::<(), BridgeError>(())
    }
    .await;

    report.connected = manager.is_connected();
    if let Err(e) = outcome {
        warn!(error = %e, "Health probe degraded");
        report.status = HealthStatus::Degraded;
        report.ping_error = Some(e.message());
    }
    report
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Failed,
}

/// Outcome of a single diagnostic step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Probe {
    fn skipped(reason: &str) -> Self {
        Self {
            status: ProbeStatus::Failed,
            error: Some(format!("skipped: {}", reason)),
            duration_ms: 0,
            details: serde_json::Map::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

/// Run one probe step, timing it and capturing its error
async fn run_probe<F>(step: F) -> Probe
where
    F: Future<Output = Result<serde_json::Map<String, serde_json::Value>>>,
{
    let started = Instant::now();
    let outcome = step.await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(details) => Probe {
            status: ProbeStatus::Success,
            error: None,
            duration_ms,
            details,
        },
        Err(e) => Probe {
            status: ProbeStatus::Failed,
            error: Some(e.message()),
            duration_ms,
            details: serde_json::Map::new(),
        },
    }
}

/// Process environment as seen by the server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub mongodb_uri: String,
    pub database: String,
    pub port: u16,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub connected: bool,
    pub connect_attempts: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResults {
    pub connect: Probe,
    pub ping: Probe,
    pub list_collections: Probe,
    pub sample_query: Probe,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub timestamp: String,
    pub environment: EnvironmentInfo,
    pub connection: ConnectionState,
    pub tests: ProbeResults,
}

/// Run connect, ping, list-collections, and sample-query in order
///
/// A failed step marks every later step failed without running it.
pub async fn diagnose(manager: &ConnectionManager, environment: EnvironmentInfo) -> DiagnosticReport {
    let connect = run_probe(async {
        manager.ensure_connected().await?;
        let mut details = serde_json::Map::new();
        details.insert("database".into(), manager.database_name().into());
        Ok(details)
    })
    .await;

    let ping = if connect.succeeded() {
        run_probe(async {
            manager.ping().await?;
            Ok(serde_json::Map::new())
        })
        .await
    } else {
        Probe::skipped("connection unavailable")
    };

    let mut collections = Vec::new();
    let list_collections = if ping.succeeded() {
        run_probe(async {
            collections = manager.list_collection_names().await?;
            collections.sort();
            let mut details = serde_json::Map::new();
            details.insert("count".into(), collections.len().into());
            details.insert("collections".into(), collections.clone().into());
            Ok(details)
        })
        .await
    } else {
        Probe::skipped("ping failed")
    };

    let sample_query = if list_collections.succeeded() {
        run_probe(async {
            let mut details = serde_json::Map::new();
            match collections.first() {
                Some(name) => {
                    let connection = manager.ensure_connected().await?;
                    let sample = connection.collection(name).find_one(doc! {}).await?;
                    details.insert("collection".into(), name.clone().into());
                    details.insert("documentFound".into(), sample.is_some().into());
                }
                None => {
                    details.insert("collection".into(), serde_json::Value::Null);
                    details.insert("documentFound".into(), false.into());
                }
            }
            Ok(details)
        })
        .await
    } else {
        Probe::skipped("collections unavailable")
    };

    DiagnosticReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment,
        connection: ConnectionState {
            connected: manager.is_connected(),
            connect_attempts: manager.connect_attempts(),
        },
        tests: ProbeResults {
            connect,
            ping,
            list_collections,
            sample_query,
        },
    }
}
