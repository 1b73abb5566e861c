//! docbridge HTTP gateway
//!
//! Exposes a fixed set of MongoDB operations as JSON-over-HTTP endpoints for
//! clients that cannot open driver connections themselves.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::{Args, ServerConfig};
pub use error::{ApiError, ErrorStyle};
pub use routes::router;
pub use state::AppState;
