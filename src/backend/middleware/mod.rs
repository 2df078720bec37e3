//! Middleware Module
//!
//! - **`auth`** - bearer-token extractor for protected routes

pub mod auth;

pub use auth::{bearer_token, AuthUser};
