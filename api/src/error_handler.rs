use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use explorer_core::ExplorerError;
use thiserror::Error;

use crate::core::{app_state::ConfigError, http::response_envelope::ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Http { status, .. } => *status,
            // startup-only
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Maps the explorer taxonomy onto HTTP statuses and stable codes.
impl From<ExplorerError> for AppError {
    fn from(err: ExplorerError) -> Self {
        let message = err.to_string();
        match err {
            ExplorerError::Connection(_) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "CONNECTION_FAILED",
                message,
            },
            ExplorerError::NotConnected => AppError::Http {
                status: StatusCode::CONFLICT,
                code: "NOT_CONNECTED",
                message,
            },
            ExplorerError::MalformedFilter(_) => AppError::Http {
                status: StatusCode::BAD_REQUEST,
                code: "MALFORMED_FILTER",
                message,
            },
            ExplorerError::InvalidRequest(_) => AppError::Http {
                status: StatusCode::BAD_REQUEST,
                code: "INVALID_REQUEST",
                message,
            },
            ExplorerError::NotFound(what) => AppError::NotFound(what),
            ExplorerError::RemoteOperation(_) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "REMOTE_OPERATION_FAILED",
                message,
            },
            ExplorerError::Embedding(_) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "EMBEDDING_FAILED",
                message,
            },
        }
    }
}
