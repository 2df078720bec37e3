//! Backend Module
//!
//! Server-side code, compiled with the `ssr` feature.
//!
//! # Architecture
//!
//! - **`presence`** - presence registry, connection hub, lifecycle
//! - **`relay`** - relay policy and dispatcher
//! - **`notifications`** - durable notification store and its HTTP API
//! - **`websocket`** - `/ws` endpoint
//! - **`auth`** / **`middleware`** - session token verification
//! - **`server`** / **`routes`** - configuration, state, router
//! - **`error`** - HTTP error type

pub mod server;

pub mod routes;

pub mod presence;

pub mod relay;

pub mod notifications;

pub mod websocket;

pub mod error;

pub mod auth;

pub mod middleware;

pub use server::{create_app, AppState, ServerConfig};
pub use presence::{ConnectionHub, LifecycleManager, PresenceRegistry};
pub use relay::{RelayDispatcher, RelayOutcome};
pub use error::BackendError;
