//! HTTP API
//!
//! # Route map
//!
//! | Module | Routes |
//! |--------|--------|
//! | [`root`] | `/`, `/api` |
//! | [`users`] | `/api/users`, `/api/function/users`, `/api/generic/users` |
//! | [`bookings`] | `/api/bookings`, `/api/class/bookings`, `/api/generic/bookings` |
//! | [`menu`] | `/api/menu`, `/api/menu-readonly`, `/api/mixin/menu` |
//! | [`auth`] | `/auth/users`, `/auth/users/me`, `/auth/token/login`, `/auth/token/logout` |
//! | [`session`] | `/api-auth/login`, `/api-auth/logout` |
//! | [`health`] | `/health` |
//!
//! The restaurant routes (landing page and `/api/...`) are served both at
//! the root and under `/restaurant`. Trailing slashes are optional
//! everywhere.

pub mod auth;
pub mod bookings;
pub mod extract;
pub mod health;
pub mod menu;
pub mod pagination;
pub mod root;
pub mod session;
pub mod templates;
pub mod users;
pub mod viewset;

use axum::Router;

use crate::core::ServerState;

/// Landing page, API root and every resource family
pub fn restaurant_router() -> Router<ServerState> {
    Router::new()
        .merge(root::router())
        .merge(users::router())
        .merge(bookings::router())
        .merge(menu::router())
}

/// Every route of the service (without state or middleware)
pub fn router() -> Router<ServerState> {
    let restaurant = restaurant_router();
    Router::new()
        .merge(restaurant.clone())
        .nest("/restaurant", restaurant)
        .merge(auth::router())
        .merge(session::router())
        .merge(health::router())
}
