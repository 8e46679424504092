//! Connection lifecycle for one Chroma server.
//!
//! A [`SessionManager`] owns at most one live [`Session`]. It is created by the
//! caller and passed explicitly to whoever needs it (the HTTP layer keeps it
//! in its router state), so tests and multiple independent sessions need no
//! global state.
//!
//! Lifecycle:
//!   * `connect` performs one heartbeat; success installs a new session and
//!     replaces any previous one, failure leaves no session installed.
//!   * `disconnect` drops the session unconditionally.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chroma_client::{ChromaClient, ChromaConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::errors::{ExplorerError, ExplorerResult};

/// A successful handshake with a Chroma server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub connected: bool,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    fn established(name: &str, host: &str, port: u16) -> Self {
        let name = name.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            name: if name.is_empty() {
                format!("{host}:{port}")
            } else {
                name.to_string()
            },
            host: host.to_string(),
            port,
            connected: true,
            created_at: Utc::now(),
        }
    }
}

/// Live handle: connection record, remote client and embedding provider.
///
/// Cheap to clone; operations run on a clone so the manager's lock is never
/// held across a remote call.
#[derive(Debug, Clone)]
pub struct Session {
    connection: Connection,
    client: ChromaClient,
    embedder: Arc<Embedder>,
}

impl Session {
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn client(&self) -> &ChromaClient {
        &self.client
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }
}

/// Holds the single active session.
#[derive(Debug)]
pub struct SessionManager {
    template: ChromaConfig,
    embedder: Arc<Embedder>,
    slot: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Creates a manager with no session.
    ///
    /// `template` supplies tenant, database and timeout for every connection;
    /// its endpoint is replaced by the host/port given to [`SessionManager::connect`].
    pub fn new(template: ChromaConfig, embedder: Embedder) -> Self {
        Self {
            template,
            embedder: Arc::new(embedder),
            slot: RwLock::new(None),
        }
    }

    /// Checks liveness of `host:port` and installs a new session on success.
    ///
    /// # Errors
    /// [`ExplorerError::Connection`] with the underlying message on any failure.
    pub async fn connect(&self, name: &str, host: &str, port: u16) -> ExplorerResult<Connection> {
        let cfg = self.template.for_host_port(host, port);
        let endpoint = cfg.endpoint.clone();

        let handshake = async {
            let client = ChromaClient::new(cfg)?;
            client.heartbeat().await?;
            Ok::<_, chroma_client::ChromaError>(client)
        };

        match handshake.await {
            Ok(client) => {
                let connection = Connection::established(name, host, port);
                *self.slot.write().await = Some(Session {
                    connection: connection.clone(),
                    client,
                    embedder: Arc::clone(&self.embedder),
                });
                info!(%endpoint, id = %connection.id, name = %connection.name, "connected to chroma");
                Ok(connection)
            }
            Err(err) => {
                self.slot.write().await.take();
                warn!(%endpoint, error = %err, "chroma handshake failed");
                Err(ExplorerError::Connection(err.to_string()))
            }
        }
    }

    /// Drops the current session, if any. Always succeeds.
    pub async fn disconnect(&self) {
        if let Some(session) = self.slot.write().await.take() {
            info!(id = %session.connection.id, "disconnected from chroma");
        }
    }

    /// True iff a session exists and is marked connected.
    pub async fn is_connected(&self) -> bool {
        self.slot
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.connection.connected)
    }

    /// The current connection record, if any.
    pub async fn connection(&self) -> Option<Connection> {
        self.slot.read().await.as_ref().map(|s| s.connection.clone())
    }

    /// The live session, or [`ExplorerError::NotConnected`].
    pub async fn require(&self) -> ExplorerResult<Session> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|s| s.connection.connected)
            .cloned()
            .ok_or(ExplorerError::NotConnected)
    }
}
