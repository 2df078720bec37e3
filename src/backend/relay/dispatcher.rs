/**
 * Relay Dispatcher
 *
 * Forwards invites, invite acceptances and private messages to the
 * recipient's live connection, applying the per-kind `RelayPolicy`.
 *
 * # Flow
 *
 * 1. Persist first when the policy says so, and only then. A failed write
 *    suppresses the delivery for that event.
 * 2. Look up the recipient in the presence registry. No store or registry
 *    lock is held across the persistence await.
 * 3. Deliver through the event sink. A delivery failure (socket closing)
 *    counts as offline.
 * 4. When offline, apply the policy's offline action.
 *
 * Nothing here returns an error to the caller. Each call reports a
 * `RelayOutcome` for logging and tests.
 */
use std::sync::Arc;

use crate::backend::notifications::store::NotificationStore;
use crate::backend::presence::hub::EventSink;
use crate::backend::presence::registry::PresenceRegistry;
use crate::backend::relay::policy::{policy, Durability, EventKind, OfflineAction, RelayPolicy};
use crate::shared::{
    event::InviteNotice, NewNotification, Notification, NotificationKind, PrivateMessage,
    ServerEvent, UserId, UserRef,
};

/// What happened to one relayed event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Pushed to a live transient recipient
    Delivered,
    /// Persisted; recipient was offline
    StoredOffline,
    /// Persisted and pushed
    StoredAndDelivered,
    /// Recipient offline and nothing kept
    Dropped,
    /// Persistence failed, delivery skipped
    Suppressed,
}

#[derive(Clone)]
pub struct RelayDispatcher {
    registry: PresenceRegistry,
    sink: Arc<dyn EventSink>,
    store: Arc<dyn NotificationStore>,
}

pub fn invite_message(from: &UserRef) -> String {
    format!("{} sent you a friend invite", from.username)
}

impl RelayDispatcher {
    pub fn new(
        registry: PresenceRegistry,
        sink: Arc<dyn EventSink>,
        store: Arc<dyn NotificationStore>,
    ) -> Self {
        Self {
            registry,
            sink,
            store,
        }
    }

    /// Persist a friend invite, then push it to `to` if online
    pub async fn send_invite(&self, from: &UserRef, to: &UserRef) -> RelayOutcome {
        let new = NewNotification {
            user_id: to.id.clone(),
            sender_id: from.id.clone(),
            kind: NotificationKind::Invite,
            message: invite_message(from),
        };
        let from = from.clone();
        self.dispatch_recorded(EventKind::Invite, &to.id, new, move |record| {
            ServerEvent::ReceiveInvite(InviteNotice {
                from,
                message: record.message.clone(),
                created_at: record.created_at,
                notification_id: record.id,
            })
        })
        .await
    }

    /// Tell the inviter `from` that `to` accepted
    pub async fn accept_invite(&self, from: &UserId, to: &UserRef) -> RelayOutcome {
        let event = ServerEvent::InviteAccepted { by: to.clone() };
        self.dispatch(EventKind::InviteAccepted, from, event).await
    }

    pub async fn send_private_message(&self, to: &UserId, message: PrivateMessage) -> RelayOutcome {
        let event = ServerEvent::ReceivePrivateMessage(message);
        self.dispatch(EventKind::PrivateMessage, to, event).await
    }

    /// Relay an event described by a notification record
    ///
    /// The record is written only when `kind` is `PersistBeforeDelivery`.
    /// A transient kind still gets an unsaved record to build its event from.
    async fn dispatch_recorded<F>(
        &self,
        kind: EventKind,
        to: &UserId,
        new: NewNotification,
        event: F,
    ) -> RelayOutcome
    where
        F: FnOnce(&Notification) -> ServerEvent + Send,
    {
        let policy = policy(kind);
        let (record, stored) = match policy.durability {
            Durability::PersistBeforeDelivery => match self.store.create(new).await {
                Ok(record) => {
                    tracing::debug!("[Relay] Stored {} {} for {}", kind.as_str(), record.id, to);
                    (record, true)
                }
                Err(e) => {
                    tracing::error!("[Relay] Failed to persist {} for {}: {}", kind.as_str(), to, e);
                    return RelayOutcome::Suppressed;
                }
            },
            Durability::Transient => (Notification::from_new(new), false),
        };

        self.settle(kind, policy, to, event(&record), stored).await
    }

    /// Relay an event that carries no record
    async fn dispatch(&self, kind: EventKind, to: &UserId, event: ServerEvent) -> RelayOutcome {
        let policy = policy(kind);
        if policy.persists() {
            tracing::error!("[Relay] {} for {} has no record to persist", kind.as_str(), to);
            return RelayOutcome::Suppressed;
        }
        self.settle(kind, policy, to, event, false).await
    }

    /// Deliver to `to` if online, otherwise apply the offline action
    async fn settle(
        &self,
        kind: EventKind,
        policy: RelayPolicy,
        to: &UserId,
        event: ServerEvent,
        stored: bool,
    ) -> RelayOutcome {
        let delivered = match self.registry.lookup(to).await {
            Some(handle) => match self.sink.deliver(&handle, event).await {
                Ok(()) => {
                    tracing::debug!("[Relay] {} delivered to {} via {}", kind.as_str(), to, handle);
                    true
                }
                Err(e) => {
                    tracing::warn!("[Relay] {} to {} not delivered: {}", kind.as_str(), to, e);
                    false
                }
            },
            None => false,
        };

        match (delivered, stored) {
            (true, true) => RelayOutcome::StoredAndDelivered,
            (true, false) => RelayOutcome::Delivered,
            (false, true) if policy.offline == OfflineAction::KeepRecord => {
                RelayOutcome::StoredOffline
            }
            (false, _) => {
                if policy.offline == OfflineAction::DropWithWarning {
                    tracing::warn!("[Relay] {} is offline, dropping {}", to, kind.as_str());
                } else {
                    tracing::debug!("[Relay] {} is offline, dropping {}", to, kind.as_str());
                }
                RelayOutcome::Dropped
            }
        }
    }
}
