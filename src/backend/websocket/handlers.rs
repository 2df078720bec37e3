/**
 * Relay WebSocket Handler
 *
 * `GET /ws` upgrades to a socket served by two tasks:
 *
 * - a writer task that drains the connection's hub channel into the sink,
 *   so every outbound event (relayed or reply) goes through one FIFO;
 * - the reader loop below, which handles inbound frames in order. Binary
 *   frames are answered with a `malformed_event` error.
 *
 * When the reader loop ends for any reason, the session is disconnected.
 * That detaches the hub channel, and the writer finishes once it has
 * flushed what was already queued.
 */
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};

use crate::backend::presence::hub::{EventSink, OutboundReceiver};
use crate::backend::server::state::AppState;
use crate::backend::websocket::events::handle_client_frame;
use crate::shared::{ErrorCode, ServerEvent};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut session, outbound) = state.lifecycle.connect().await;
    let handle = session.handle().clone();
    let (sender, mut receiver) = socket.split();

    let writer = tokio::spawn(write_outbound(sender, outbound));

    while let Some(incoming) = receiver.next().await {
        let reply = match incoming {
            Ok(Message::Text(text)) => {
                handle_client_frame(&mut session, &state.dispatcher, text.as_str()).await
            }
            Ok(Message::Binary(bytes)) => {
                tracing::debug!("[WS] Binary frame ({} bytes) on {}", bytes.len(), handle);
                Some(ServerEvent::error(
                    ErrorCode::MalformedEvent,
                    "binary frames are not supported, send JSON text",
                ))
            }
            Ok(Message::Close(_)) => break,
            // pings are answered by axum
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("[WS] Read error on {}: {}", handle, e);
                break;
            }
        };

        if let Some(reply) = reply {
            if let Err(e) = state.hub.deliver(&handle, reply).await {
                tracing::debug!("[WS] Reply to {} dropped: {}", handle, e);
                break;
            }
        }
    }

    session.disconnect().await;
    if let Err(e) = writer.await {
        tracing::warn!("[WS] Writer task for {} failed: {}", handle, e);
    }
}

async fn write_outbound<S>(mut sender: S, mut outbound: OutboundReceiver)
where
    S: futures_util::Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Some(event) = outbound.recv().await {
        let json = match event.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("[WS] Failed to serialize {}: {}", event.name(), e);
                continue;
            }
        };
        if let Err(e) = sender.send(Message::Text(json.into())).await {
            tracing::debug!("[WS] Write failed: {}", e);
            break;
        }
    }
    let _ = sender.close().await;
}
