//! Unified error handling for `chroma-client`.
//!
//! This module exposes a single top-level error type [`ChromaError`] for the whole
//! library and a nested [`ConfigError`] for settings that are read from the
//! environment. Small helpers for reading/validating environment variables are
//! provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the prefix `[Chroma Client]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, ChromaError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `chroma-client` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChromaError {
    /// Configuration/validation errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The endpoint is empty or does not start with http/https.
    #[error("[Chroma Client] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Underlying HTTP transport error (connect refused, timeout, TLS...).
    #[error("[Chroma Client] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[Chroma Client] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[Chroma Client] decode error: {0}")]
    Decode(String),

    /// A collection, tenant or database name cannot be used as a path segment.
    #[error("[Chroma Client] invalid name: '{0}'")]
    InvalidName(String),

    /// The named collection does not exist on the server.
    #[error("[Chroma Client] collection not found: {0}")]
    CollectionNotFound(String),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors that realistically happen while loading client settings.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (ports, timeouts).
    #[error("[Chroma Client] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `CHROMA_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Chroma Client] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `CHROMA_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an environment variable, falling back to `default` when unset or blank.
pub fn env_or(name: &'static str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ChromaError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            ChromaError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ChromaError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Trims a response body down to a short single-line snippet for error messages.
pub fn make_snippet(text: &str) -> String {
    text.trim()
        .chars()
        .take(240)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_trimmed_and_bounded() {
        let body = format!("  \n{}\n", "x".repeat(500));
        let s = make_snippet(&body);
        assert_eq!(s.len(), 240);
        assert!(s.chars().all(|c| c == 'x'));
    }

    #[test]
    fn endpoint_scheme_is_enforced() {
        assert!(validate_http_endpoint("CHROMA_URL", "http://localhost:8000").is_ok());
        assert!(validate_http_endpoint("CHROMA_URL", "https://chroma.internal").is_ok());
        let err = validate_http_endpoint("CHROMA_URL", "localhost:8000").unwrap_err();
        assert!(matches!(
            err,
            ChromaError::Config(ConfigError::InvalidFormat { var: "CHROMA_URL", .. })
        ));
    }
}
