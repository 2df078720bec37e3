//! Notification HTTP handlers

use axum::{extract::State, Json};

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::notifications::store::SharedNotificationStore;
use crate::shared::notification::ListNotificationsResponse;

/// `GET /api/notifications`
///
/// Notifications addressed to the authenticated user, newest first.
pub async fn list_notifications(
    AuthUser(user_id): AuthUser,
    State(store): State<SharedNotificationStore>,
) -> Result<Json<ListNotificationsResponse>, BackendError> {
    let notifications = store.list_for_user(&user_id).await?;
    tracing::debug!("Listing {} notifications for {}", notifications.len(), user_id);
    Ok(Json(ListNotificationsResponse { notifications }))
}
