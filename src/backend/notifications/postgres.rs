//! PostgreSQL notification store
//!
//! Table layout lives in `migrations/`. Tests run against a live database
//! when `DATABASE_URL` is set (see `tests/integration/postgres_store_test.rs`).

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use super::store::{NotificationStore, StoreError};
use crate::shared::{NewNotification, Notification, NotificationKind, UserId};

#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_notification(row: PgRow) -> Result<Notification, StoreError> {
    let kind: String = row.try_get("kind")?;
    let kind = NotificationKind::from_str(&kind)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown notification kind '{}'", kind)))?;

    Ok(Notification {
        id: row.try_get("id")?,
        user_id: UserId::new(row.try_get::<String, _>("user_id")?),
        sender_id: UserId::new(row.try_get::<String, _>("sender_id")?),
        kind,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let record = Notification::from_new(notification);

        // RETURNING gives back created_at at the column's precision
        let row = sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, sender_id, kind, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, sender_id, kind, message, created_at
            "#,
        )
        .bind(record.id)
        .bind(record.user_id.as_str())
        .bind(record.sender_id.as_str())
        .bind(record.kind.as_str())
        .bind(&record.message)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_notification(row)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, sender_id, kind, message, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_notification).collect()
    }
}
