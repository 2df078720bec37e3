//! Inbound frame handling
//!
//! Turns one text frame into lifecycle or relay calls. Every failure is
//! answered with an `error` event on the same connection; nothing here
//! closes the socket.
//!
//! Invites are dispatched on their own task. Their store write can stall,
//! and the reader must keep draining frames so a close still reaches
//! `disconnect`. Transient events never touch the store and run inline.

use crate::backend::presence::lifecycle::ConnectionSession;
use crate::backend::relay::{RelayDispatcher, RelayOutcome};
use crate::shared::{ClientEvent, ErrorCode, ServerEvent, UserRef};

/// Handle one text frame, returning the reply for this connection, if any
pub async fn handle_client_frame(
    session: &mut ConnectionSession,
    dispatcher: &RelayDispatcher,
    text: &str,
) -> Option<ServerEvent> {
    let event = match ClientEvent::parse(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("[WS] Malformed frame on {}: {}", session.handle(), e);
            return Some(ServerEvent::error(ErrorCode::MalformedEvent, e.to_string()));
        }
    };
    tracing::debug!("[WS] {} on {}", event.name(), session.handle());

    match event {
        ClientEvent::Register(payload) => match session.register(&payload.token).await {
            Ok(user_id) => Some(ServerEvent::Registered { user_id }),
            Err(e) => {
                tracing::warn!("[WS] Registration failed on {}: {}", session.handle(), e);
                Some(e.to_server_event())
            }
        },
        ClientEvent::SendInvite(payload) => {
            if let Err(e) = session.authorize(&payload.from.id) {
                return Some(e.to_server_event());
            }
            let from = with_verified_name(session, payload.from);
            let to = payload.to;
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let outcome = dispatcher.send_invite(&from, &to).await;
                log_outcome("send-invite", outcome);
            });
            None
        }
        ClientEvent::AcceptInvite(payload) => {
            // the accepting user is `to`
            if let Err(e) = session.authorize(&payload.to.id) {
                return Some(e.to_server_event());
            }
            let to = with_verified_name(session, payload.to);
            let outcome = dispatcher.accept_invite(&payload.from, &to).await;
            log_outcome("accept-invite", outcome);
            None
        }
        ClientEvent::SendPrivateMessage(payload) => {
            if let Err(e) = session.authorize(&payload.message.sender_id) {
                return Some(e.to_server_event());
            }
            let outcome = dispatcher
                .send_private_message(&payload.to, payload.message)
                .await;
            log_outcome("send-private-message", outcome);
            None
        }
    }
}

/// The token's display name wins over the one in the payload
fn with_verified_name(session: &ConnectionSession, mut user: UserRef) -> UserRef {
    if let Some(username) = session.username() {
        user.username = username.to_string();
    }
    user
}

fn log_outcome(event: &str, outcome: RelayOutcome) {
    tracing::debug!("[WS] {} -> {:?}", event, outcome);
}
