//! Shared types for the Little Lemon backend
//!
//! Models, payload validation and client DTOs used by the server and by
//! API clients.

pub mod client;
pub mod models;
pub mod serializer;

// Re-exports
pub use serializer::{FieldErrors, Fields};
