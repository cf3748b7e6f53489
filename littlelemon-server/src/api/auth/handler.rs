//! Account and Token Handlers

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use shared::client::TokenResponse;
use shared::models::{AccountView, Credentials, Registration, User};

use crate::api::extract::JsonBody;
use crate::auth::{CurrentUser, IssuedToken, password};
use crate::core::ServerState;
use crate::db::repository::{ListQuery, token, user};
use crate::security_log;
use crate::utils::{AppError, AppResult};

pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";
pub const ACCOUNT_DISABLED: &str = "User account is disabled.";

/// Check credentials and issue a recorded token
///
/// Unknown users and wrong passwords share one message.
pub(crate) async fn login(
    state: &ServerState,
    credentials: &Credentials,
) -> AppResult<(User, IssuedToken)> {
    let pool = state.pool();
    let account = user::find_by_username(pool, &credentials.username).await?;
    let Some(account) = account else {
        security_log!("WARN", "login_failed", username = credentials.username.clone());
        return Err(AppError::non_field(INVALID_CREDENTIALS));
    };

    let stored = user::password_hash(pool, account.id).await?.unwrap_or_default();
    if !password::verify_password(&credentials.password, &stored) {
        security_log!("WARN", "login_failed", username = credentials.username.clone());
        return Err(AppError::non_field(INVALID_CREDENTIALS));
    }
    if !account.is_active {
        security_log!("WARN", "login_disabled", username = credentials.username.clone());
        return Err(AppError::non_field(ACCOUNT_DISABLED));
    }

    let issued = state
        .jwt_service()
        .generate_token(account.id, &account.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    token::record(pool, &issued.jti, account.id).await?;

    tracing::info!(user_id = account.id, username = %account.username, "User logged in");
    Ok((account, issued))
}

/// Revoke a token id; unknown ids are ignored
pub(crate) async fn logout(state: &ServerState, user: &CurrentUser) -> AppResult<()> {
    if let Some(jti) = &user.jti {
        token::revoke(state.pool(), jti).await?;
    }
    tracing::info!(user_id = user.id, username = %user.username, "User logged out");
    Ok(())
}

/// POST /auth/token/login - exchange credentials for a token
pub async fn token_login(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody,
) -> AppResult<Json<TokenResponse>> {
    let delay = state.config().login_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let credentials = Credentials::from_payload(&payload)?;
    let (_, issued) = login(&state, &credentials).await?;
    Ok(Json(TokenResponse {
        auth_token: issued.token,
    }))
}

/// POST /auth/token/logout - revoke the presented token
pub async fn token_logout(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<StatusCode> {
    logout(&state, &current_user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/users - self-service registration
pub async fn register(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody,
) -> AppResult<(StatusCode, Json<AccountView>)> {
    let registration = Registration::from_payload(&payload)?;
    let password_hash = password::hash_password(&registration.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let account = user::create_account(
        state.pool(),
        user::NewAccount {
            username: &registration.username,
            email: &registration.email,
            password_hash: &password_hash,
            is_staff: false,
        },
    )
    .await?;

    tracing::info!(user_id = account.id, username = %account.username, "Account registered");
    Ok((StatusCode::CREATED, Json(AccountView::from(&account))))
}

/// GET /auth/users - staff see every account, others only their own
pub async fn list_accounts(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AccountView>>> {
    let pool = state.pool();
    let accounts = if current_user.is_staff {
        user::find_all(pool, &ListQuery::default()).await?
    } else {
        user::find_by_id(pool, current_user.id)
            .await?
            .into_iter()
            .collect()
    };
    Ok(Json(accounts.iter().map(AccountView::from).collect()))
}

/// GET /auth/users/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<AccountView>> {
    let account = user::find_by_id(state.pool(), current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Not found."))?;
    Ok(Json(AccountView::from(&account)))
}
