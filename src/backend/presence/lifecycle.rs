/**
 * Connection Lifecycle
 *
 * Drives each connection through `Connected → Registered → Closed` and keeps
 * the presence registry and connection hub consistent with it.
 *
 * # Transitions
 *
 * - `connect` allocates a handle and opens its outbound channel.
 * - `register` resolves the user from an access token and binds it to the
 *   handle. Registering again on the same connection is allowed; the
 *   registry drops whatever the handle was bound to before.
 * - `disconnect` removes the handle's presence entry and closes its
 *   outbound channel. It is idempotent.
 */
use std::sync::Arc;
use thiserror::Error;

use crate::backend::auth::sessions::{IdentityResolver, SessionError};
use crate::backend::presence::hub::{ConnectionHub, OutboundReceiver};
use crate::backend::presence::registry::PresenceRegistry;
use crate::shared::{ConnectionHandle, ErrorCode, ServerEvent, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Registered(UserId),
    Closed,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("connection is not registered")]
    NotRegistered,
    #[error("connection is registered as {registered}, not {claimed}")]
    Forbidden { registered: UserId, claimed: UserId },
    #[error("registration rejected: {0}")]
    InvalidToken(#[from] SessionError),
    #[error("connection is closed")]
    Closed,
}

impl LifecycleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LifecycleError::NotRegistered | LifecycleError::Closed => ErrorCode::NotRegistered,
            LifecycleError::Forbidden { .. } => ErrorCode::Forbidden,
            LifecycleError::InvalidToken(_) => ErrorCode::InvalidToken,
        }
    }

    /// Client-visible `error` event for this failure
    pub fn to_server_event(&self) -> ServerEvent {
        ServerEvent::error(self.code(), self.to_string())
    }
}

/// Creates connection sessions bound to a shared registry and hub
#[derive(Clone)]
pub struct LifecycleManager {
    registry: PresenceRegistry,
    hub: ConnectionHub,
    identity: Arc<dyn IdentityResolver>,
}

impl LifecycleManager {
    pub fn new(
        registry: PresenceRegistry,
        hub: ConnectionHub,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            registry,
            hub,
            identity,
        }
    }

    /// Accept a new connection
    pub async fn connect(&self) -> (ConnectionSession, OutboundReceiver) {
        let handle = ConnectionHandle::generate();
        let outbound = self.hub.attach(handle.clone()).await;
        tracing::info!("[Presence] Client connected: {}", handle);

        let session = ConnectionSession {
            handle,
            state: ConnectionState::Connected,
            username: None,
            manager: self.clone(),
        };
        (session, outbound)
    }
}

/// Per-connection state owned by the socket's reader task
pub struct ConnectionSession {
    handle: ConnectionHandle,
    state: ConnectionState,
    /// Display name from the last accepted token
    username: Option<String>,
    manager: LifecycleManager,
}

impl ConnectionSession {
    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match &self.state {
            ConnectionState::Registered(user_id) => Some(user_id),
            _ => None,
        }
    }

    /// Verified display name of the registered user, if the token had one
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            ConnectionState::Registered(_) => self.username.as_deref(),
            _ => None,
        }
    }

    /// Bind this connection to the user named by `token`
    ///
    /// A rejected token leaves both the session state and the registry
    /// untouched.
    pub async fn register(&mut self, token: &str) -> Result<UserId, LifecycleError> {
        if self.state == ConnectionState::Closed {
            return Err(LifecycleError::Closed);
        }

        let identity = self.manager.identity.resolve(token)?;
        let user_id = identity.user_id;
        let outcome = self
            .manager
            .registry
            .register(user_id.clone(), self.handle.clone())
            .await;

        if let Some(previous) = &outcome.released_user {
            tracing::info!(
                "[Presence] {} re-registered from {} to {}",
                self.handle,
                previous,
                user_id
            );
        }
        if let Some(old) = &outcome.replaced_handle {
            tracing::info!("[Presence] {} moved from {} to {}", user_id, old, self.handle);
        }
        tracing::info!("[Presence] Registered: {} - {}", user_id, self.handle);

        self.state = ConnectionState::Registered(user_id.clone());
        self.username = identity.username;
        Ok(user_id)
    }

    /// Check that this connection may act as `claimed`
    pub fn authorize(&self, claimed: &UserId) -> Result<&UserId, LifecycleError> {
        match &self.state {
            ConnectionState::Registered(user_id) if user_id == claimed => Ok(user_id),
            ConnectionState::Registered(user_id) => Err(LifecycleError::Forbidden {
                registered: user_id.clone(),
                claimed: claimed.clone(),
            }),
            ConnectionState::Connected => Err(LifecycleError::NotRegistered),
            ConnectionState::Closed => Err(LifecycleError::Closed),
        }
    }

    /// Tear down presence for this connection; safe to call more than once
    pub async fn disconnect(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }

        let removed = self.manager.registry.remove_by_handle(&self.handle).await;
        self.manager.hub.detach(&self.handle).await;
        self.state = ConnectionState::Closed;

        match removed {
            Some(user_id) => tracing::info!("[Presence] Disconnected: {} - {}", user_id, self.handle),
            None => tracing::info!("[Presence] Client disconnected: {}", self.handle),
        }
    }
}
