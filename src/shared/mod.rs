//! Shared Module
//!
//! This module contains types that are shared between the relay server and
//! its clients: identifiers, the JSON events exchanged over the relay
//! socket, persisted notification records, and the errors raised while
//! decoding them.
//!
//! # Overview
//!
//! The shared module is platform-agnostic and compiles without the `ssr`
//! feature, so a client crate can depend on it for the wire format alone.

/// Identifier newtypes
pub mod ids;

/// Relay socket events
pub mod event;

/// Persisted notification records
pub mod notification;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use ids::{ConnectionHandle, UserId};
pub use event::{ClientEvent, ErrorCode, InviteNotice, PrivateMessage, ServerEvent, UserRef};
pub use notification::{ListNotificationsResponse, NewNotification, Notification, NotificationKind};
pub use error::SharedError;
