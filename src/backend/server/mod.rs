//! Server Module
//!
//! - **`config`** - layered configuration and database loading
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`init`** - app creation
//!
//! # Example
//!
//! ```rust,no_run
//! use chatme::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod state;
pub mod config;
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use state::AppState;
pub use init::create_app;
