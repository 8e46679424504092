use explorer_core::Connection;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/connection`.
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    /// Display name; blank falls back to "host:port".
    #[serde(default)]
    pub name: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
}
