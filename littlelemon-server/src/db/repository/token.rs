//! Auth Token Repository
//!
//! A token is honoured only while its `jti` row exists.

use super::RepoResult;
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn record(pool: &SqlitePool, jti: &str, user_id: i64) -> RepoResult<()> {
    sqlx::query("INSERT INTO auth_token (jti, user_id, created_at) VALUES (?, ?, ?)")
        .bind(jti)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn is_active(pool: &SqlitePool, jti: &str, user_id: i64) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM auth_token WHERE jti = ? AND user_id = ?",
    )
    .bind(jti)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(found > 0)
}

pub async fn revoke(pool: &SqlitePool, jti: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM auth_token WHERE jti = ?")
        .bind(jti)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
