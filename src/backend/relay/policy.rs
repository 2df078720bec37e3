//! Relay Policy
//!
//! Durability and offline handling per relayed event kind. Every kind the
//! dispatcher forwards must have a row in `policy`.

/// Relayed event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Invite,
    InviteAccepted,
    PrivateMessage,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::Invite,
        EventKind::InviteAccepted,
        EventKind::PrivateMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Invite => "invite",
            EventKind::InviteAccepted => "invite-accepted",
            EventKind::PrivateMessage => "private-message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// Write a record first; skip delivery if the write fails
    PersistBeforeDelivery,
    /// Never written anywhere
    Transient,
}

/// What happens when the recipient has no live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineAction {
    /// The persisted record is the fallback
    KeepRecord,
    DropSilently,
    DropWithWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayPolicy {
    pub durability: Durability,
    pub offline: OfflineAction,
}

impl RelayPolicy {
    pub fn persists(&self) -> bool {
        self.durability == Durability::PersistBeforeDelivery
    }
}

pub fn policy(kind: EventKind) -> RelayPolicy {
    match kind {
        EventKind::Invite => RelayPolicy {
            durability: Durability::PersistBeforeDelivery,
            offline: OfflineAction::KeepRecord,
        },
        EventKind::InviteAccepted => RelayPolicy {
            durability: Durability::Transient,
            offline: OfflineAction::DropSilently,
        },
        EventKind::PrivateMessage => RelayPolicy {
            durability: Durability::Transient,
            offline: OfflineAction::DropWithWarning,
        },
    }
}
