//! Authentication Module
//!
//! Accounts and logins are handled by a separate service that issues JWT
//! access tokens (`sub` = user id). This crate only verifies them.
//!
//! - **`sessions`** - token verification and the `IdentityResolver` seam

pub mod sessions;

pub use sessions::{Claims, Identity, IdentityResolver, SessionError, SessionKeys};
