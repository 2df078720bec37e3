//! Backend Error Module
//!
//! - **`types`** - `BackendError` and its status mapping
//! - **`conversion`** - `IntoResponse` rendering
//!
//! Errors inside the relay core never reach here; they are turned into
//! `error` events on the socket instead.

pub mod types;
pub mod conversion;

pub use types::BackendError;
