//! Startup data
//!
//! Creates the configured groups and staff account when they do not exist
//! yet.

use sqlx::SqlitePool;

use crate::auth::password;
use crate::core::config::AdminAccount;
use crate::db::repository::group;
use crate::db::repository::user::{self, NewAccount};
use crate::utils::AppError;

pub async fn ensure_groups(pool: &SqlitePool, names: &[String]) -> Result<(), AppError> {
    for name in names {
        let id = group::ensure(pool, name).await?;
        tracing::debug!(group_id = id, name = %name, "Group ready");
    }
    Ok(())
}

pub async fn ensure_admin(pool: &SqlitePool, admin: &AdminAccount) -> Result<(), AppError> {
    if user::find_by_username(pool, &admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Admin account already present");
        return Ok(());
    }

    let password_hash = password::hash_password(&admin.password)
        .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
    let account = user::create_account(
        pool,
        NewAccount {
            username: &admin.username,
            email: &admin.email,
            password_hash: &password_hash,
            is_staff: true,
        },
    )
    .await?;

    tracing::info!(user_id = account.id, username = %account.username, "Admin account created");
    Ok(())
}
