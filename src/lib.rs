//! Chatme - Presence and Relay Core
//!
//! Real-time relay for the Chatme app: tracks which users are online,
//! forwards friend invites, invite acceptances and private messages to
//! their live WebSocket connection, and persists invites so offline users
//! find them later.
//!
//! # Module Structure
//!
//! - **`shared`** - wire types (ids, socket events, notification records)
//! - **`backend`** - the server (only compiled with `ssr`)
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend: axum, jsonwebtoken and
//!   the tracing subscriber
//!
//! # Usage
//!
//! ```rust,no_run
//! use chatme::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder().port(5001).build()?;
//! let app = create_app(&config).await;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
