//! Two real WebSocket clients talking through a bound relay server

use crate::common::{session_keys, token_for, HangingStore};
use chatme::backend::notifications::{InMemoryNotificationStore, SharedNotificationStore};
use chatme::backend::routes::create_router;
use chatme::backend::server::AppState;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> (SocketAddr, AppState) {
    spawn_server_with(Arc::new(InMemoryNotificationStore::new())).await
}

async fn spawn_server_with(store: SharedNotificationStore) -> (SocketAddr, AppState) {
    let state = AppState::new(store, session_keys());
    let app = create_router(state.clone(), &[]);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    client
}

async fn send(client: &mut Client, frame: Value) {
    client.send(Message::text(frame.to_string())).await.unwrap();
}

async fn recv(client: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn register(client: &mut Client, user: &str) {
    send(client, json!({"event": "register", "data": {"token": token_for(user)}})).await;
    let reply = recv(client).await;
    assert_eq!(reply, json!({"event": "registered", "data": {"userId": user}}));
}

async fn wait_until_offline(state: &AppState, user: &str) {
    let user_id = chatme::shared::UserId::from(user);
    for _ in 0..100 {
        if !state.registry.is_online(&user_id).await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{} still online", user);
}

#[tokio::test]
async fn invite_accept_and_private_message_round_trip() {
    let (addr, state) = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    register(&mut alice, "alice").await;
    register(&mut bob, "bob").await;

    send(
        &mut alice,
        json!({"event": "send-invite", "data": {
            "from": {"id": "alice", "username": "Alice"},
            "to": {"id": "bob", "username": "Bob"}
        }}),
    )
    .await;
    let invite = recv(&mut bob).await;
    assert_eq!(invite["event"], "receive-invite");
    assert_eq!(invite["data"]["from"]["id"], "alice");
    // display name comes from alice's token, not the payload
    assert_eq!(invite["data"]["from"]["username"], "alice");
    assert_eq!(invite["data"]["message"], "alice sent you a friend invite");
    assert!(invite["data"]["notificationId"].is_string());

    send(
        &mut bob,
        json!({"event": "accept-invite", "data": {
            "from": "alice",
            "to": {"id": "bob", "username": "Bob"}
        }}),
    )
    .await;
    let accepted = recv(&mut alice).await;
    assert_eq!(
        accepted,
        json!({"event": "invite-accepted", "data": {"by": {"id": "bob", "username": "bob"}}})
    );

    send(
        &mut bob,
        json!({"event": "send-private-message", "data": {
            "to": "alice",
            "message": {"senderId": "bob", "text": "hi alice", "clientId": 7}
        }}),
    )
    .await;
    let message = recv(&mut alice).await;
    assert_eq!(
        message,
        json!({"event": "receive-private-message", "data": {
            "senderId": "bob", "text": "hi alice", "clientId": 7
        }})
    );

    assert_eq!(state.registry.len().await, 2);
}

#[tokio::test]
async fn malformed_and_unauthorized_frames_get_error_events() {
    let (addr, state) = spawn_server().await;
    let mut client = connect(addr).await;

    client.send(Message::text("{not json")).await.unwrap();
    let reply = recv(&mut client).await;
    assert_eq!(reply["event"], "error");
    assert_eq!(reply["data"]["code"], "malformed_event");

    send(
        &mut client,
        json!({"event": "send-private-message", "data": {
            "to": "bob", "message": {"senderId": "alice", "text": "hi"}
        }}),
    )
    .await;
    let reply = recv(&mut client).await;
    assert_eq!(reply["data"]["code"], "not_registered");

    send(&mut client, json!({"event": "register", "data": {"token": "forged"}})).await;
    let reply = recv(&mut client).await;
    assert_eq!(reply["data"]["code"], "invalid_token");

    // still open and usable
    register(&mut client, "alice").await;
    assert!(state.registry.is_online(&chatme::shared::UserId::from("alice")).await);
}

#[tokio::test]
async fn closing_the_socket_removes_presence() {
    let (addr, state) = spawn_server().await;
    let mut carol = connect(addr).await;
    register(&mut carol, "carol").await;

    carol.close(None).await.unwrap();

    wait_until_offline(&state, "carol").await;
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn binary_frames_are_rejected() {
    let (addr, state) = spawn_server().await;
    let mut client = connect(addr).await;
    register(&mut client, "dave").await;

    client.send(Message::binary(vec![0x01, 0x02])).await.unwrap();
    let reply = recv(&mut client).await;
    assert_eq!(reply["event"], "error");
    assert_eq!(reply["data"]["code"], "malformed_event");

    assert!(state.registry.is_online(&chatme::shared::UserId::from("dave")).await);
}

#[tokio::test]
async fn close_during_stalled_invite_still_removes_presence() {
    let (addr, state) = spawn_server_with(Arc::new(HangingStore)).await;
    let mut alice = connect(addr).await;
    register(&mut alice, "alice").await;

    send(
        &mut alice,
        json!({"event": "send-invite", "data": {
            "from": {"id": "alice", "username": "Alice"},
            "to": {"id": "bob", "username": "Bob"}
        }}),
    )
    .await;
    alice.close(None).await.unwrap();

    wait_until_offline(&state, "alice").await;
    assert!(state.registry.is_empty().await);
}
