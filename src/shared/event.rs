/**
 * Relay Wire Events
 *
 * This module defines the JSON frames exchanged over the relay socket.
 * Every frame has the shape `{"event": "<name>", "data": <payload>}`, with
 * kebab-case event names.
 *
 * # Inbound (client → server)
 *
 * - `register` - bind this connection to the identity in an access token
 * - `send-invite` - send a friend invite
 * - `accept-invite` - tell the inviter their invite was accepted
 * - `send-private-message` - relay a private message
 *
 * # Outbound (server → client)
 *
 * - `registered`, `receive-invite`, `invite-accepted`,
 *   `receive-private-message`, `error`
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::ids::UserId;

/// A user as referenced inside invite payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
}

impl UserRef {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// Payload of `register`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterPayload {
    /// Access token issued by the auth layer; the user id is taken from it
    pub token: String,
}

/// Payload of `send-invite`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendInvitePayload {
    pub from: UserRef,
    pub to: UserRef,
}

/// Payload of `accept-invite`
///
/// `from` is the user who originally sent the invite; `to` is the user
/// accepting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptInvitePayload {
    pub from: UserId,
    pub to: UserRef,
}

/// A private message body
///
/// Only `senderId` is interpreted by the relay. Every other field is
/// forwarded to the recipient untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivateMessage {
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

impl PrivateMessage {
    pub fn text(sender_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        let mut body = serde_json::Map::new();
        body.insert("text".to_string(), serde_json::Value::String(text.into()));
        Self {
            sender_id: sender_id.into(),
            body,
        }
    }
}

/// Payload of `send-private-message`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivateMessagePayload {
    pub to: UserId,
    pub message: PrivateMessage,
}

/// Event sent by a client over the relay socket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Register(RegisterPayload),
    SendInvite(SendInvitePayload),
    AcceptInvite(AcceptInvitePayload),
    SendPrivateMessage(PrivateMessagePayload),
}

impl ClientEvent {
    /// Event names accepted from clients
    pub const NAMES: [&'static str; 4] = [
        "register",
        "send-invite",
        "accept-invite",
        "send-private-message",
    ];

    /// Decode and validate one text frame
    ///
    /// Unknown event names are reported separately from payloads that fail
    /// to deserialize, so the client can tell a protocol mismatch from a
    /// bad field.
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        let name = value
            .get("event")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SharedError::validation("event", "missing event name"))?;
        if !Self::NAMES.contains(&name) {
            return Err(SharedError::unknown_event(name));
        }

        let event: ClientEvent = serde_json::from_value(value)?;
        event.validate()?;
        Ok(event)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Register(_) => "register",
            ClientEvent::SendInvite(_) => "send-invite",
            ClientEvent::AcceptInvite(_) => "accept-invite",
            ClientEvent::SendPrivateMessage(_) => "send-private-message",
        }
    }

    fn validate(&self) -> Result<(), SharedError> {
        match self {
            ClientEvent::Register(p) => {
                if p.token.trim().is_empty() {
                    return Err(SharedError::validation("token", "token cannot be empty"));
                }
            }
            ClientEvent::SendInvite(p) => {
                require_id(&p.from.id, "from.id")?;
                require_id(&p.to.id, "to.id")?;
                if p.from.id == p.to.id {
                    return Err(SharedError::validation("to.id", "cannot invite yourself"));
                }
            }
            ClientEvent::AcceptInvite(p) => {
                require_id(&p.from, "from")?;
                require_id(&p.to.id, "to.id")?;
            }
            ClientEvent::SendPrivateMessage(p) => {
                require_id(&p.to, "to")?;
                require_id(&p.message.sender_id, "message.senderId")?;
            }
        }
        Ok(())
    }
}

fn require_id(id: &UserId, field: &str) -> Result<(), SharedError> {
    if id.is_blank() {
        return Err(SharedError::validation(field, "user id cannot be empty"));
    }
    Ok(())
}

/// Invite notification pushed to an online recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InviteNotice {
    pub from: UserRef,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Id of the persisted record, so the client can reconcile it later
    pub notification_id: Uuid,
}

/// Machine-readable reason attached to an `error` event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedEvent,
    NotRegistered,
    Forbidden,
    InvalidToken,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorNotice {
    pub code: ErrorCode,
    pub message: String,
}

/// Event pushed by the server to a connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Registered {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    ReceiveInvite(InviteNotice),
    InviteAccepted {
        by: UserRef,
    },
    ReceivePrivateMessage(PrivateMessage),
    Error(ErrorNotice),
}

impl ServerEvent {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorNotice {
            code,
            message: message.into(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Registered { .. } => "registered",
            ServerEvent::ReceiveInvite(_) => "receive-invite",
            ServerEvent::InviteAccepted { .. } => "invite-accepted",
            ServerEvent::ReceivePrivateMessage(_) => "receive-private-message",
            ServerEvent::Error(_) => "error",
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
