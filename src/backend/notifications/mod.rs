//! Notifications Module
//!
//! - **`store`** - `NotificationStore` trait and `StoreError`
//! - **`memory`** - in-memory store (no database configured, tests)
//! - **`postgres`** - sqlx-backed store
//! - **`handlers`** - `GET /api/notifications`

pub mod store;
pub mod memory;
pub mod postgres;
pub mod handlers;

pub use store::{NotificationStore, SharedNotificationStore, StoreError};
pub use memory::InMemoryNotificationStore;
pub use postgres::PgNotificationStore;
