/**
 * Presence Registry
 *
 * In-memory mapping from account (`UserId`) to the live connection
 * (`ConnectionHandle`) that account is currently reachable on.
 *
 * # Invariants
 *
 * - At most one handle per user; a new registration overwrites the old one
 *   (last registration wins).
 * - At most one user per handle; registering a handle under a new user
 *   drops the handle's previous user entry.
 * - `remove_by_handle` removes exactly the entry whose value is that handle.
 *
 * Both directions are indexed so the two maps are always inverse of each
 * other and removal by handle is a single lookup.
 *
 * # Thread Safety
 *
 * The registry is a cheap-to-clone handle around `Arc<RwLock<>>`. Every
 * operation holds the lock only for the in-memory update; nothing awaits
 * I/O while holding it.
 */
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::shared::{ConnectionHandle, UserId};

#[derive(Debug, Default)]
struct RegistryInner {
    by_user: HashMap<UserId, ConnectionHandle>,
    by_handle: HashMap<ConnectionHandle, UserId>,
}

/// What a `register` call displaced, for logging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Older handle the user was reachable on before this call
    pub replaced_handle: Option<ConnectionHandle>,
    /// User the handle was bound to before this call
    pub released_user: Option<UserId>,
}

/// Shared presence map; see the module docs for invariants
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `user_id` to `handle`, overwriting any previous binding of either
    pub async fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Registration {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let released_user = match inner.by_handle.remove(&handle) {
            Some(previous) if previous != user_id => {
                inner.by_user.remove(&previous);
                Some(previous)
            }
            _ => None,
        };

        let replaced_handle = inner
            .by_user
            .insert(user_id.clone(), handle.clone())
            .filter(|old| *old != handle);
        if let Some(old) = &replaced_handle {
            inner.by_handle.remove(old);
        }

        inner.by_handle.insert(handle, user_id);

        Registration {
            replaced_handle,
            released_user,
        }
    }

    pub async fn lookup(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        self.inner.read().await.by_user.get(user_id).cloned()
    }

    /// User currently bound to `handle`, if any
    pub async fn user_for(&self, handle: &ConnectionHandle) -> Option<UserId> {
        self.inner.read().await.by_handle.get(handle).cloned()
    }

    /// Remove the entry pointing at `handle`, returning the user it belonged to
    ///
    /// No-op when the handle is not registered, which is the case for
    /// connections that never registered or were superseded by a newer
    /// connection of the same user.
    pub async fn remove_by_handle(&self, handle: &ConnectionHandle) -> Option<UserId> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let user_id = inner.by_handle.remove(handle)?;
        if inner.by_user.get(&user_id) == Some(handle) {
            inner.by_user.remove(&user_id);
        }
        Some(user_id)
    }

    pub async fn is_online(&self, user_id: &UserId) -> bool {
        self.inner.read().await.by_user.contains_key(user_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_user.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of online users, sorted
    pub async fn online_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.inner.read().await.by_user.keys().cloned().collect();
        users.sort();
        users
    }
}
