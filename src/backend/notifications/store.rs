//! Notification Store
//!
//! Durable sink for events whose policy requires persistence. The relay
//! only ever calls `create`; `list_for_user` backs the HTTP API that
//! clients poll after reconnecting.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::shared::{NewNotification, Notification, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("notification store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new record and return it with its id and timestamp
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError>;

    /// Records addressed to `user_id`, newest first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, StoreError>;
}

pub type SharedNotificationStore = Arc<dyn NotificationStore>;
