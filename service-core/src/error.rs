use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// HTTP-facing error taxonomy shared by the services.
///
/// Every variant renders as a `text/plain` body. Internal failures only ever
/// expose their public message; the source is logged server-side.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(anyhow::Error),

    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        source: anyhow::Error,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    /// Wraps `source` so clients only see `message`.
    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            message,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. }
            | AppError::InternalError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::BadRequest(err) | AppError::NotFound(err) | AppError::PayloadTooLarge(err) => {
                err.to_string()
            }
            AppError::Internal { message, source } => {
                tracing::error!(error = ?source, "{}", message);
                message.to_string()
            }
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Unhandled internal error");
                "Internal server error".to_string()
            }
            AppError::ServiceUnavailable => "Service unavailable".to_string(),
            AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "Configuration error");
                "Configuration error".to_string()
            }
        };

        (status, body).into_response()
    }
}
