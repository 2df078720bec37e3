//! In-memory notification store, used when no database is configured
//! and in tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::{NotificationStore, StoreError};
use crate::shared::{NewNotification, Notification, UserId};

#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationStore {
    records: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record in insertion order
    pub async fn all(&self) -> Vec<Notification> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let record = Notification::from_new(notification);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, StoreError> {
        let records = self.records.read().await;
        // insertion order is chronological, so reverse for newest first
        Ok(records
            .iter()
            .rev()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect())
    }
}
