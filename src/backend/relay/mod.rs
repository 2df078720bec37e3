//! Relay Module
//!
//! - **`policy`** - durability and offline handling per event kind
//! - **`dispatcher`** - forwards events to live connections

pub mod policy;
pub mod dispatcher;

pub use dispatcher::{RelayDispatcher, RelayOutcome};
pub use policy::{policy, Durability, EventKind, OfflineAction, RelayPolicy};
