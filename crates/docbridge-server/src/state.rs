//! Shared application state

use crate::config::ServerConfig;
use docbridge_mongodb::{ConnectionManager, Dispatcher};
use std::sync::Arc;

/// State handed to every handler
///
/// The dispatcher holds the single connection manager for the process.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(manager: Arc<ConnectionManager>, config: ServerConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(manager),
            config: Arc::new(config),
        }
    }

    /// Build state with a manager for the configured connection
    pub fn from_config(config: ServerConfig) -> Self {
        let manager = Arc::new(ConnectionManager::new(config.connection.clone()));
        Self::new(manager, config)
    }

    pub fn connection(&self) -> &Arc<ConnectionManager> {
        self.dispatcher.connection()
    }
}
