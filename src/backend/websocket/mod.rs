//! WebSocket Module
//!
//! - **`handlers`** - `GET /ws` upgrade and per-socket tasks
//! - **`events`** - inbound frame handling

pub mod handlers;
pub mod events;

pub use handlers::ws_handler;
pub use events::handle_client_frame;
