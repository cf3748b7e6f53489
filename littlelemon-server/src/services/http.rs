//! HTTP application assembly
//!
//! Layer order, outermost first:
//!
//! 1. trailing-slash normalization (before routing)
//! 2. request logging
//! 3. compression, CORS
//! 4. request id stamping and propagation
//! 5. cookie manager
//! 6. authentication

use axum::{Router, middleware};
use tower::Layer;
use tower_cookies::CookieManagerLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::auth::authenticate;
use crate::core::ServerState;

/// The served application type
pub type App = NormalizePath<Router>;

/// HTTP request logging middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the application with state and middleware
pub fn build_app(state: ServerState) -> App {
    let router = crate::api::router()
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(CookieManagerLayer::new())
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
