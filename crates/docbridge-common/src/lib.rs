//! Common utilities for docbridge
//!
//! This crate provides the error type shared by the driver layer and the HTTP server.

pub mod error;

pub use error::{BridgeError, Result};
