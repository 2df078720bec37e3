/**
 * Server Initialization
 *
 * 1. Pick the notification store (PostgreSQL when configured, in-memory
 *    otherwise)
 * 2. Build session keys from the configured secret
 * 3. Wire `AppState` and the router
 */
use axum::Router;
use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::notifications::{
    memory::InMemoryNotificationStore, postgres::PgNotificationStore, SharedNotificationStore,
};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing chatme relay server");

    let notifications: SharedNotificationStore =
        match load_database(config.database_url.as_deref()).await {
            Some(pool) => Arc::new(PgNotificationStore::new(pool)),
            None => Arc::new(InMemoryNotificationStore::new()),
        };

    let session_keys = SessionKeys::from_secret(&config.jwt_secret());
    let app_state = AppState::new(notifications, session_keys);

    let app = create_router(app_state, &config.allowed_origins);
    tracing::info!(
        "Router configured ({} allowed origins)",
        config.allowed_origins.len()
    );
    app
}
