//! Server configuration, state and startup
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared handler state
//! - [`Server`] - HTTP server
//! - [`ConfigError`] / [`ServerError`] - startup failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{ConfigError, Result, ServerError};
pub use server::Server;
pub use state::ServerState;
