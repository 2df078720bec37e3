//! Route Configuration Module
//!
//! - **`router`** - main router, CORS and tracing layers
//! - **`api_routes`** - JSON API endpoints

pub mod router;
pub mod api_routes;

pub use router::create_router;
