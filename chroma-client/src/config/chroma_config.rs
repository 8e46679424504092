use crate::error_handler::{Result, env_opt_u64, env_or, validate_http_endpoint};

/// Tenant used by a stock Chroma server.
pub const DEFAULT_TENANT: &str = "default_tenant";
/// Database used by a stock Chroma server.
pub const DEFAULT_DATABASE: &str = "default_database";
/// Endpoint of a locally running Chroma server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a single Chroma server.
///
/// # Fields
///
/// - `endpoint`: base URL of the server, e.g. `http://localhost:8000`.
/// - `tenant` / `database`: namespace used for every collection path.
/// - `timeout_secs`: per-request timeout; `None` falls back to [`DEFAULT_TIMEOUT_SECS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromaConfig {
    pub endpoint: String,
    pub tenant: String,
    pub database: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl ChromaConfig {
    /// Creates a config for `endpoint` with the default tenant and database.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            timeout_secs: None,
        }
    }

    /// Loads settings from the environment.
    ///
    /// # Env
    /// - `CHROMA_URL` (default `http://localhost:8000`)
    /// - `CHROMA_TENANT` (default `default_tenant`)
    /// - `CHROMA_DATABASE` (default `default_database`)
    /// - `CHROMA_TIMEOUT_SECS` (optional)
    pub fn from_env() -> Result<Self> {
        let endpoint = env_or("CHROMA_URL", DEFAULT_ENDPOINT);
        validate_http_endpoint("CHROMA_URL", &endpoint)?;

        Ok(Self {
            endpoint,
            tenant: env_or("CHROMA_TENANT", DEFAULT_TENANT),
            database: env_or("CHROMA_DATABASE", DEFAULT_DATABASE),
            timeout_secs: env_opt_u64("CHROMA_TIMEOUT_SECS")?,
        })
    }

    /// Returns a copy of this config pointed at `host:port`.
    ///
    /// A bare host gets an `http://` scheme; a host that already carries a
    /// scheme keeps it. Tenant, database and timeout are preserved.
    pub fn for_host_port(&self, host: &str, port: u16) -> Self {
        let host = host.trim().trim_end_matches('/');
        let endpoint = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{port}")
        } else {
            format!("http://{host}:{port}")
        };

        Self {
            endpoint,
            ..self.clone()
        }
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
