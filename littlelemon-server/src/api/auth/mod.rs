//! Account API
//!
//! | Path | Method | Description | Access |
//! |------|--------|-------------|--------|
//! | /auth/users | POST | register an account | anyone |
//! | /auth/users | GET | list accounts | logged-in users |
//! | /auth/users/me | GET | own account | logged-in users |
//! | /auth/token/login | POST | obtain a token | anyone |
//! | /auth/token/logout | POST | revoke the presented token | logged-in users |

pub(crate) mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Permission, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/auth/users", post(handler::register))
        .route("/auth/token/login", post(handler::token_login));

    let account_routes = Router::new()
        .route("/auth/users", get(handler::list_accounts))
        .route("/auth/users/me", get(handler::me))
        .route("/auth/token/logout", post(handler::token_logout))
        .route_layer(middleware::from_fn(require_permission(
            Permission::IsAuthenticated,
        )));

    public_routes.merge(account_routes)
}
