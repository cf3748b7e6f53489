//! Browsable-API login
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api-auth/login | GET | login form |
//! | /api-auth/login | POST | log in, set the session cookie, redirect |
//! | /api-auth/logout | GET, POST | revoke the session token, clear the cookie, redirect |
//!
//! The `sessionid` cookie carries a regular auth token and is honoured by
//! [`crate::auth::authenticate`] like an `Authorization` header.

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use shared::models::Credentials;
use tera::Context;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::api::auth::handler;
use crate::api::templates;
use crate::auth::{CSRF_COOKIE, CurrentUser, SESSION_COOKIE};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

const DEFAULT_REDIRECT: &str = "/api/";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api-auth/login", get(login_form).post(login))
        .route("/api-auth/logout", get(logout).post(logout))
}

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Local redirect target, defaulting to the API root
///
/// Absolute and scheme-relative URLs are refused.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
        _ => DEFAULT_REDIRECT,
    }
}

fn render_form(
    state: &ServerState,
    next: &str,
    username: &str,
    error: Option<&str>,
) -> AppResult<Html<String>> {
    let mut ctx = Context::new();
    ctx.insert("next", next);
    ctx.insert("username", username);
    ctx.insert("error", &error);
    templates::render(state.templates(), templates::LOGIN, &ctx)
}

fn session_cookie(name: &'static str, value: String, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// GET /api-auth/login
pub async fn login_form(
    State(state): State<ServerState>,
    Query(params): Query<NextParam>,
) -> AppResult<Html<String>> {
    render_form(&state, safe_next(params.next.as_deref()), "", None)
}

/// POST /api-auth/login
///
/// Sets the `sessionid` cookie and a `csrftoken` cookie whose value must
/// be echoed in `X-CSRFToken` on cookie-authenticated writes. Failed
/// logins re-render the form with the error line.
pub async fn login(
    State(state): State<ServerState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let next = safe_next(form.next.as_deref()).to_string();
    let credentials = Credentials {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    if credentials.username.is_empty() || credentials.password.is_empty() {
        let page = render_form(
            &state,
            &next,
            &credentials.username,
            Some(handler::INVALID_CREDENTIALS),
        )?;
        return Ok(page.into_response());
    }

    match handler::login(&state, &credentials).await {
        Ok((_, issued)) => {
            let secure = state.config().is_production();
            let csrf = uuid::Uuid::new_v4().simple().to_string();
            cookies.add(session_cookie(SESSION_COOKIE, issued.token, true, secure));
            cookies.add(session_cookie(CSRF_COOKIE, csrf, false, secure));
            Ok(Redirect::to(&next).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let message = errors
                .get(shared::serializer::NON_FIELD_ERRORS)
                .and_then(|m| m.first())
                .map(String::as_str)
                .unwrap_or(handler::INVALID_CREDENTIALS)
                .to_string();
            let page = render_form(&state, &next, &credentials.username, Some(&message))?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET|POST /api-auth/logout
pub async fn logout(
    State(state): State<ServerState>,
    cookies: Cookies,
    current_user: Option<CurrentUser>,
    Query(params): Query<NextParam>,
) -> AppResult<Redirect> {
    if let Some(user) = current_user {
        handler::logout(&state, &user).await?;
    }
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    cookies.remove(Cookie::build(CSRF_COOKIE).path("/").build());
    Ok(Redirect::to(safe_next(params.next.as_deref())))
}
