//! Little Lemon server - restaurant backend
//!
//! # Overview
//!
//! REST API over three resources of the Little Lemon restaurant:
//!
//! - **Menu** (`api/menu`): dishes with price and stock
//! - **Bookings** (`api/bookings`): table reservations
//! - **Users** (`api/users`): accounts and their groups
//!
//! plus token authentication (`/auth/...`) and a cookie login for the
//! browsable API (`/api-auth/...`).
//!
//! # Module layout
//!
//! ```text
//! littlelemon-server/src/
//! ├── core/          # config, state, server, bootstrap
//! ├── auth/          # JWT, passwords, permissions, middleware
//! ├── services/      # application assembly and HTTP layers
//! ├── api/           # routes, generic viewset, resources
//! ├── utils/         # errors, logging
//! └── db/            # SQLite pool and repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::{App, build_app};
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger_with_file;

/// Security event logging under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and initialize logging from `LOG_LEVEL` / `LOG_DIR`
pub fn setup_environment() {
    // A missing .env file is normal outside development
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    __    _ __  __  __        __
   / /   (_) /_/ /_/ /__     / /   ___  ____ ___  ____  ____
  / /   / / __/ __/ / _ \   / /   / _ \/ __ `__ \/ __ \/ __ \
 / /___/ / /_/ /_/ /  __/  / /___/  __/ / / / / / /_/ / / / /
/_____/_/\__/\__/_/\___/  /_____/\___/_/ /_/ /_/\____/_/ /_/
    "#
    );
}
