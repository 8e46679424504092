//! Typed client for the ChromaDB HTTP API.
//!
//! - [`client::ChromaClient`]: single-attempt calls for heartbeat, collections and records.
//! - [`wire`]: request bodies and the flat/nested response shapes, normalized on decode.
//! - [`models`]: `Collection`, `Document`, `QueryResult` shared with callers.

pub mod client;
pub mod config;
pub mod error_handler;
pub mod models;
pub mod wire;

pub use client::ChromaClient;
pub use config::ChromaConfig;
pub use error_handler::{ChromaError, Result};
