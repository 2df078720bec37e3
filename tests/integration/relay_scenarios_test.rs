//! End-to-end relay scenarios over in-process connections

use crate::common::{assert_no_event, next_event, FailingStore, RelayHarness};
use chatme::backend::notifications::{InMemoryNotificationStore, NotificationStore};
use chatme::backend::relay::RelayOutcome;
use chatme::shared::{PrivateMessage, ServerEvent, UserId, UserRef};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn alice() -> UserRef {
    UserRef::new("alice", "Alice")
}

fn bob() -> UserRef {
    UserRef::new("bob", "Bob")
}

#[tokio::test]
async fn invite_between_online_users_is_persisted_then_delivered() {
    let relay = RelayHarness::new();
    let (_alice, mut alice_rx) = relay.online("alice").await;
    let (_bob, mut bob_rx) = relay.online("bob").await;

    let outcome = relay.dispatcher.send_invite(&alice(), &bob()).await;
    assert_eq!(outcome, RelayOutcome::StoredAndDelivered);

    let stored = relay.store.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, UserId::from("bob"));
    assert_eq!(stored[0].sender_id, UserId::from("alice"));

    match next_event(&mut bob_rx) {
        ServerEvent::ReceiveInvite(notice) => {
            assert_eq!(notice.from, alice());
            assert_eq!(notice.notification_id, stored[0].id);
            assert_eq!(notice.created_at, stored[0].created_at);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_no_event(&mut alice_rx);
}

#[tokio::test]
async fn invite_to_never_registered_user_is_only_persisted() {
    let relay = RelayHarness::new();
    let (_alice, mut alice_rx) = relay.online("alice").await;

    let outcome = relay.dispatcher.send_invite(&alice(), &bob()).await;

    assert_eq!(outcome, RelayOutcome::StoredOffline);
    let pending = relay.store.list_for_user(&UserId::from("bob")).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_no_event(&mut alice_rx);
    assert_eq!(relay.hub.connection_count().await, 1);
}

#[tokio::test]
async fn failed_persistence_emits_nothing() {
    let failing = Arc::new(FailingStore::default());
    let relay = RelayHarness::with_store(InMemoryNotificationStore::new(), failing.clone());
    let (_bob, mut bob_rx) = relay.online("bob").await;

    let outcome = relay.dispatcher.send_invite(&alice(), &bob()).await;

    assert_eq!(outcome, RelayOutcome::Suppressed);
    assert_eq!(failing.attempts(), 1);
    assert_no_event(&mut bob_rx);

    // the connection is still usable afterwards
    let outcome = relay
        .dispatcher
        .send_private_message(&UserId::from("bob"), PrivateMessage::text("alice", "still here?"))
        .await;
    assert_eq!(outcome, RelayOutcome::Delivered);
}

#[tokio::test]
async fn disconnect_makes_user_unreachable() {
    let relay = RelayHarness::new();
    let (mut carol, _rx) = relay.online("carol").await;

    carol.disconnect().await;

    assert_eq!(relay.registry.lookup(&UserId::from("carol")).await, None);
    let outcome = relay
        .dispatcher
        .send_private_message(&UserId::from("carol"), PrivateMessage::text("alice", "hi"))
        .await;
    assert_eq!(outcome, RelayOutcome::Dropped);
}

#[tokio::test]
async fn private_message_to_offline_user_is_dropped_without_persistence() {
    let relay = RelayHarness::new();

    let outcome = relay
        .dispatcher
        .send_private_message(&UserId::from("dave"), PrivateMessage::text("alice", "hello"))
        .await;

    assert_eq!(outcome, RelayOutcome::Dropped);
    assert!(relay.store.is_empty().await);
}

#[tokio::test]
async fn reconnect_routes_to_newest_connection() {
    let relay = RelayHarness::new();
    let (mut old, mut old_rx) = relay.online("alice").await;
    let (_new, mut new_rx) = relay.online("alice").await;

    old.disconnect().await;
    let outcome = relay.dispatcher.accept_invite(&UserId::from("alice"), &bob()).await;

    assert_eq!(outcome, RelayOutcome::Delivered);
    assert_eq!(next_event(&mut new_rx), ServerEvent::InviteAccepted { by: bob() });
    assert_eq!(old_rx.recv().await, None);
}

#[tokio::test]
async fn reregistering_a_connection_releases_the_old_identity() {
    let relay = RelayHarness::new();
    let (mut session, mut rx) = relay.online("u1").await;

    session
        .register(&crate::common::token_for("u2"))
        .await
        .unwrap();

    assert_eq!(relay.registry.lookup(&UserId::from("u1")).await, None);
    assert_eq!(
        relay.registry.lookup(&UserId::from("u2")).await,
        Some(session.handle().clone())
    );

    let outcome = relay
        .dispatcher
        .send_private_message(&UserId::from("u1"), PrivateMessage::text("x", "stale?"))
        .await;
    assert_eq!(outcome, RelayOutcome::Dropped);
    assert_no_event(&mut rx);
}

#[tokio::test]
async fn events_to_one_recipient_keep_dispatch_order() {
    let relay = RelayHarness::new();
    let (_bob, mut bob_rx) = relay.online("bob").await;

    relay.dispatcher.send_invite(&alice(), &bob()).await;
    relay
        .dispatcher
        .send_private_message(&UserId::from("bob"), PrivateMessage::text("alice", "1"))
        .await;
    relay
        .dispatcher
        .send_private_message(&UserId::from("bob"), PrivateMessage::text("alice", "2"))
        .await;

    let names: Vec<&str> = (0..3).map(|_| next_event(&mut bob_rx).name()).collect();
    assert_eq!(
        names,
        vec!["receive-invite", "receive-private-message", "receive-private-message"]
    );
}
