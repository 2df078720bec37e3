//! Presence Module
//!
//! Tracks which accounts are online and on which connection.
//!
//! - **`registry`** - user ↔ connection handle map
//! - **`hub`** - outbound channel per open connection
//! - **`lifecycle`** - connect / register / disconnect state machine

pub mod registry;
pub mod hub;
pub mod lifecycle;

pub use registry::{PresenceRegistry, Registration};
pub use hub::{ConnectionHub, DeliveryError, EventSink, OutboundReceiver};
pub use lifecycle::{ConnectionSession, ConnectionState, LifecycleError, LifecycleManager};
