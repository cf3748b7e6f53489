//! Services - HTTP application assembly

pub mod http;

pub use self::http::{App, build_app};
