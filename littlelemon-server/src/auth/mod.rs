//! Authentication and authorization
//!
//! - [`JwtService`] - token signing and validation
//! - [`CurrentUser`] - authenticated user of a request
//! - [`authenticate`] - credential resolution middleware
//! - [`require_permission`] - access level middleware
//! - [`password`] - argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, IssuedToken, JwtConfig, JwtError, JwtService};
pub use middleware::{
    CSRF_COOKIE, CSRF_HEADER, SESSION_COOKIE, authenticate, require_permission, resolve_token,
};
pub use permissions::Permission;
