//! RADIUS Server Implementation
//!
//! This crate provides the dispatch side of a RADIUS authentication server
//! built on top of the `radius-codec` wire layer.
//!
//! # Features
//!
//! - Async UDP I/O with Tokio, one task per datagram
//! - Pluggable authentication handlers
//! - Optional bound on concurrently handled requests
//! - JSON configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_server::{RadiusServer, ServerConfig, SimpleAuthHandler};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create auth handler
//!     let mut handler = SimpleAuthHandler::new();
//!     handler.add_user("alice", "password");
//!
//!     // Create server
//!     let config = ServerConfig::new(
//!         "0.0.0.0:1812".parse()?,
//!         b"secret".to_vec(),
//!         Arc::new(handler),
//!     );
//!
//!     RadiusServer::listen_and_serve(config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod server;

pub use config::{Config, ConfigError, User};
pub use server::{
    process_datagram, AuthHandler, RadiusServer, ServerConfig, ServerError, SimpleAuthHandler,
};
