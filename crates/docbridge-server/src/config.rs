//! Process configuration
//!
//! Every option can come from a flag or an environment variable. Values are
//! read once at startup and never change afterwards.

use clap::Parser;
use docbridge_common::{BridgeError, Result};
use docbridge_mongodb::{ConnectionConfig, PoolConfig, DEFAULT_DATABASE};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "docbridge")]
#[command(about = "Expose MongoDB find/aggregate/count/distinct/insert over HTTP")]
#[command(version)]
pub struct Args {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// MongoDB connection string (required)
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// Database to operate on
    #[arg(long, env = "MONGODB_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Collection counted by /health
    #[arg(long, env = "HEALTH_COLLECTION")]
    pub health_collection: Option<String>,

    /// Application name reported to the server
    #[arg(long, env = "MONGODB_APP_NAME", default_value = "docbridge")]
    pub app_name: String,

    /// Driver server selection timeout in milliseconds
    #[arg(long, env = "MONGODB_SERVER_SELECTION_TIMEOUT_MS")]
    pub server_selection_timeout_ms: Option<u64>,

    /// Minimum number of pooled driver connections
    #[arg(long, env = "MONGODB_MIN_POOL_SIZE")]
    pub min_pool_size: Option<u32>,

    /// Maximum number of pooled driver connections
    #[arg(long, env = "MONGODB_MAX_POOL_SIZE")]
    pub max_pool_size: Option<u32>,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit JSON log lines
    #[arg(long, env = "JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub connection: ConnectionConfig,
    pub health_collection: Option<String>,
    pub log_level: String,
    pub json_logs: bool,
}

impl ServerConfig {
    /// Validate parsed arguments
    ///
    /// Fails when no usable MongoDB URI was supplied.
    pub fn from_args(args: Args) -> Result<Self> {
        let uri = args
            .mongodb_uri
            .map(|uri| uri.trim().to_string())
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| {
                BridgeError::Config(
                    "MONGODB_URI is not set; pass --mongodb-uri or set the MONGODB_URI environment variable"
                        .to_string(),
                )
            })?;

        let database = match args.database.trim() {
            "" => DEFAULT_DATABASE.to_string(),
            name => name.to_string(),
        };

        if let (Some(min), Some(max)) = (args.min_pool_size, args.max_pool_size) {
            if min > max {
                return Err(BridgeError::Config(format!(
                    "MONGODB_MIN_POOL_SIZE ({}) exceeds MONGODB_MAX_POOL_SIZE ({})",
                    min, max
                )));
            }
        }

        let pool = PoolConfig {
            min_pool_size: args.min_pool_size,
            max_pool_size: args.max_pool_size,
            server_selection_timeout: args.server_selection_timeout_ms.map(Duration::from_millis),
            app_name: Some(args.app_name),
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            connection: ConnectionConfig::new(uri, database).with_pool(pool),
            health_collection: args.health_collection.filter(|name| !name.is_empty()),
            log_level: args.log_level,
            json_logs: args.json_logs,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
