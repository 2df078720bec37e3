//! Shared Error Types
//!
//! This module defines error types that are shared between the server and
//! its clients. They describe why an inbound wire frame was rejected.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A payload parsed but carried an invalid field
//! - `UnknownEvent` - The frame named an event the relay does not handle
//!
//! # Usage
//!
//! ```rust
//! use chatme::shared::error::SharedError;
//!
//! let error = SharedError::validation("to.id", "recipient id cannot be empty");
//! ```
use thiserror::Error;

/// Errors raised while decoding or validating wire payloads
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Frame named an event this server does not understand
    #[error("Unknown event: {name}")]
    UnknownEvent {
        /// The event name as sent by the client
        name: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown event error
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
