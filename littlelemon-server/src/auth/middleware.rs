//! Authentication middleware
//!
//! [`authenticate`] runs on every request: it resolves the presented
//! credentials into a [`CurrentUser`] and rejects bad tokens, but lets
//! anonymous requests through. Route groups then demand an access level
//! with [`require_permission`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::AppError;
use crate::auth::jwt::is_token_scheme;
use crate::auth::{CurrentUser, JwtService, Permission};
use crate::core::ServerState;
use crate::db::repository::{token, user};
use crate::security_log;

/// Name of the browsable-API session cookie
pub const SESSION_COOKIE: &str = "sessionid";

/// Cookie holding the CSRF token issued with the session
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header that must echo [`CSRF_COOKIE`] on cookie-authenticated writes
pub const CSRF_HEADER: &str = "x-csrftoken";

const CSRF_FAILED: &str = "CSRF Failed: CSRF token missing or incorrect.";

const INVALID_TOKEN: &str = "Invalid token.";

/// Authentication middleware
///
/// Credentials are looked up in this order:
///
/// 1. `Authorization: Token <t>` (or `Bearer <t>`)
/// 2. the `sessionid` cookie set by the browsable-API login
///
/// | Situation | Result |
/// |-----------|--------|
/// | no credentials | request continues anonymously |
/// | bad, expired, unknown or revoked header token | 401 `Invalid token.` |
/// | bad session cookie | cookie removed, request continues anonymously |
/// | session cookie on a write without a matching `X-CSRFToken` | 403 |
/// | valid token | [`CurrentUser`] inserted into extensions |
pub async fn authenticate(
    State(state): State<ServerState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    if let Some(header) = header {
        let scheme = header.split_whitespace().next().unwrap_or_default();
        if is_token_scheme(scheme) {
            let token = JwtService::extract_from_header(&header).ok_or_else(|| {
                security_log!("WARN", "auth_malformed_header", uri = req.uri().to_string());
                if header.split_whitespace().count() > 2 {
                    AppError::invalid_token(
                        "Invalid token header. Token string should not contain spaces.",
                    )
                } else {
                    AppError::invalid_token("Invalid token header. No credentials provided.")
                }
            })?;
            let user = resolve_token(&state, token).await.inspect_err(|_| {
                security_log!("WARN", "auth_failed", uri = req.uri().to_string());
            })?;
            req.extensions_mut().insert(user);
            return Ok(next.run(req).await);
        }
    }

    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        match resolve_token(&state, cookie.value()).await {
            Ok(user) => {
                if !req.method().is_safe() && !csrf_matches(&req, &cookies) {
                    security_log!(
                        "WARN",
                        "csrf_failed",
                        user_id = user.id,
                        uri = req.uri().to_string()
                    );
                    return Err(AppError::forbidden(CSRF_FAILED));
                }
                req.extensions_mut().insert(user);
            }
            Err(AppError::InvalidToken(_)) => {
                security_log!("WARN", "session_invalid", uri = req.uri().to_string());
                cookies.remove(tower_cookies::Cookie::build(SESSION_COOKIE).path("/").build());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(next.run(req).await)
}

/// `X-CSRFToken` present and equal to the `csrftoken` cookie
fn csrf_matches(req: &Request, cookies: &Cookies) -> bool {
    let header = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok());
    match (header, cookies.get(CSRF_COOKIE)) {
        (Some(header), Some(cookie)) => !header.is_empty() && header == cookie.value(),
        _ => false,
    }
}

/// Turn a raw token into the user it belongs to
///
/// The token must verify, its `jti` must still be recorded for the same
/// user, and the account must exist and be active.
pub async fn resolve_token(state: &ServerState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state
        .jwt_service()
        .validate_token(token)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::invalid_token(INVALID_TOKEN)
        })?;
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::invalid_token(INVALID_TOKEN))?;

    let pool = state.pool();
    if !token::is_active(pool, &claims.jti, user_id).await? {
        return Err(AppError::invalid_token(INVALID_TOKEN));
    }

    match user::find_by_id(pool, user_id).await? {
        Some(account) if account.is_active => Ok(CurrentUser {
            id: account.id,
            username: account.username,
            is_staff: account.is_staff,
            jti: Some(claims.jti),
        }),
        _ => Err(AppError::invalid_token("User inactive or deleted.")),
    }
}

/// Permission check middleware
///
/// Anonymous requests failing the check get 401, authenticated ones 403.
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/menu", post(handler::create))
///     .layer(middleware::from_fn(require_permission(Permission::IsAdminUser)));
/// ```
pub fn require_permission(
    permission: Permission,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req.extensions().get::<CurrentUser>();
            if permission.allows(user) {
                return Ok(next.run(req).await);
            }

            match user {
                None => {
                    security_log!(
                        "WARN",
                        "auth_missing",
                        uri = req.uri().to_string(),
                        required_permission = permission.as_str()
                    );
                    Err(AppError::unauthorized())
                }
                Some(user) => {
                    security_log!(
                        "WARN",
                        "permission_denied",
                        user_id = user.id,
                        username = user.username.clone(),
                        required_permission = permission.as_str()
                    );
                    Err(AppError::permission_denied())
                }
            }
        })
    }
}
