/**
 * Backend Error Types
 *
 * HTTP-facing errors. Each variant maps to a status code and renders as a
 * JSON body through `IntoResponse` (see `conversion`).
 *
 * # Status Code Mapping
 *
 * - `HandlerError` - the status carried by the error
 * - `Unauthorized` / `Session` - 401
 * - `Store` - 500; the detail is logged, not returned
 * - `SharedError` - 400 for bad input, 500 for serialization
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::SessionError;
use crate::backend::notifications::store::StoreError;
use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Request-level failure with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        status: StatusCode,
        message: String,
    },

    /// Missing or malformed credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    ///
    /// ```rust
    /// use axum::http::StatusCode;
    /// use chatme::backend::error::BackendError;
    ///
    /// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
    /// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    /// ```
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } | Self::Session(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } | SharedError::UnknownEvent { .. } => {
                    StatusCode::BAD_REQUEST
                }
            },
        }
    }

    /// Message returned to the client
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unauthorized { message } => message.clone(),
            Self::Session(_) => "Invalid or expired token".to_string(),
            Self::Store(_) => "Failed to load notifications".to_string(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}
