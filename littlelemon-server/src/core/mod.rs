//! Core module - configuration, state and server
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared request state
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup errors

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{AdminAccount, Config};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
