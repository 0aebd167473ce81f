//! Error types for the board.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or serving the board.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value
    #[error("Invalid config {key}: {message}")]
    Config { key: &'static str, message: String },

    /// Rejected evidence tuning
    #[error("Invalid parameters: {0}")]
    Params(#[from] comentaram_evidence::ParamsError),

    /// Catalog or topic lookup error
    #[error("Feed error: {0}")]
    Feed(#[from] comentaram_feed::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(key: &'static str, message: impl Into<String>) -> Self {
        Error::Config {
            key,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::Feed(comentaram_feed::Error::UnknownTopic(_)) => StatusCode::NOT_FOUND,
            Error::Config { .. } | Error::Params(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_topic_is_not_found() {
        let err = Error::from(comentaram_feed::Error::UnknownTopic("x".into()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn config_error_message() {
        let err = Error::config("COMENTARAM_STEP_MS", "not a number");
        assert_eq!(
            err.to_string(),
            "Invalid config COMENTARAM_STEP_MS: not a number"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
