//! Notification Records
//!
//! Durable records written for events that must survive the recipient being
//! offline. Clients fetch them over HTTP after reconnecting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::ids::UserId;

/// Kind of persisted notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A friend invite
    Invite,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Invite => "invite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "invite" => Some(NotificationKind::Invite),
            _ => None,
        }
    }
}

/// Notification about to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Recipient
    pub user_id: UserId,
    pub sender_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
}

/// A persisted notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    /// Recipient
    pub user_id: UserId,
    pub sender_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Materialize a new record with a fresh id and the current time
    pub fn from_new(new: NewNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            sender_id: new.sender_id,
            kind: new.kind,
            message: new.message,
            created_at: Utc::now(),
        }
    }
}

/// Response for listing a user's notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Notification>,
}
