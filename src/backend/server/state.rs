/**
 * Application State Management
 *
 * `AppState` holds the relay components shared by every connection and
 * HTTP handler. All fields are cheap clones of `Arc`-backed handles.
 *
 * # State Extraction
 *
 * HTTP handlers that only need the store extract it directly through
 * `FromRef`: `State(store): State<SharedNotificationStore>`.
 */
use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::notifications::store::SharedNotificationStore;
use crate::backend::presence::{ConnectionHub, LifecycleManager, PresenceRegistry};
use crate::backend::relay::RelayDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub registry: PresenceRegistry,
    pub hub: ConnectionHub,
    pub lifecycle: LifecycleManager,
    pub dispatcher: RelayDispatcher,
    /// Durable store for invites; PostgreSQL or in-memory
    pub notifications: SharedNotificationStore,
    pub session_keys: SessionKeys,
}

impl AppState {
    /// Wire the relay components around one registry and hub
    pub fn new(notifications: SharedNotificationStore, session_keys: SessionKeys) -> Self {
        let registry = PresenceRegistry::new();
        let hub = ConnectionHub::new();
        let lifecycle = LifecycleManager::new(
            registry.clone(),
            hub.clone(),
            Arc::new(session_keys.clone()),
        );
        let dispatcher = RelayDispatcher::new(
            registry.clone(),
            Arc::new(hub.clone()),
            notifications.clone(),
        );

        Self {
            registry,
            hub,
            lifecycle,
            dispatcher,
            notifications,
            session_keys,
        }
    }
}

impl FromRef<AppState> for SharedNotificationStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifications.clone()
    }
}
