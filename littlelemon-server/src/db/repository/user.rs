//! User Repository
//!
//! Accounts live in `auth_user`, group memberships (by group id) in
//! `auth_user_group`.
//! The password column holds an argon2 PHC string, or `''` for accounts
//! that cannot log in.

use super::{ListQuery, RepoError, RepoResult, group};
use chrono::Utc;
use shared::models::{DUPLICATE_USERNAME, User, UserInput};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, username, email, is_staff, is_active, date_joined";

/// New account data for [`create_account`]
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    /// argon2 hash, `""` for no usable password
    pub password_hash: &'a str,
    pub is_staff: bool,
}

fn username_conflict(err: sqlx::Error) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => RepoError::Conflict {
            field: "username",
            message: DUPLICATE_USERNAME.to_string(),
        },
        other => other,
    }
}

async fn load_groups(pool: &SqlitePool, user: &mut User) -> RepoResult<()> {
    user.groups = sqlx::query_scalar::<_, i64>(
        "SELECT group_id FROM auth_user_group WHERE user_id = ? ORDER BY group_id",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;
    Ok(())
}

async fn replace_groups(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    groups: &[i64],
) -> RepoResult<()> {
    group::check_exist(tx, groups).await?;
    sqlx::query("DELETE FROM auth_user_group WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    for group_id in groups {
        sqlx::query("INSERT OR IGNORE INTO auth_user_group (user_id, group_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(group_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<User>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM auth_user \
         WHERE ?1 IS NULL OR username LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\' \
         ORDER BY id LIMIT ?2 OFFSET ?3"
    );
    let mut users = sqlx::query_as::<_, User>(&sql)
        .bind(query.pattern())
        .bind(query.limit())
        .bind(query.offset)
        .fetch_all(pool)
        .await?;
    for user in &mut users {
        load_groups(pool, user).await?;
    }
    Ok(users)
}

pub async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM auth_user \
         WHERE ?1 IS NULL OR username LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\'",
    )
    .bind(query.pattern())
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM auth_user WHERE id = ?");
    let mut user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if let Some(user) = &mut user {
        load_groups(pool, user).await?;
    }
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM auth_user WHERE username = ?");
    let mut user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if let Some(user) = &mut user {
        load_groups(pool, user).await?;
    }
    Ok(user)
}

/// Stored password hash (`""` when the account has none)
pub async fn password_hash(pool: &SqlitePool, id: i64) -> RepoResult<Option<String>> {
    let hash = sqlx::query_scalar::<_, String>("SELECT password FROM auth_user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

/// Create a user through the users resource (no usable password)
pub async fn create(pool: &SqlitePool, data: UserInput) -> RepoResult<User> {
    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO auth_user (username, email, password, date_joined) VALUES (?, ?, '', ?) RETURNING id",
    )
    .bind(&data.username)
    .bind(data.email.as_deref().unwrap_or(""))
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(username_conflict)?;
    if let Some(groups) = &data.groups {
        replace_groups(&mut tx, id, groups).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Create an account with credentials (registration, bootstrap admin)
pub async fn create_account(pool: &SqlitePool, account: NewAccount<'_>) -> RepoResult<User> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO auth_user (username, email, password, is_staff, date_joined) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(account.username)
    .bind(account.email)
    .bind(account.password_hash)
    .bind(account.is_staff)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(username_conflict)?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create account".into()))
}

/// Update username, and email / groups when given
pub async fn update(pool: &SqlitePool, id: i64, data: UserInput) -> RepoResult<User> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE auth_user SET username = ?1, email = COALESCE(?2, email) WHERE id = ?3",
    )
    .bind(&data.username)
    .bind(data.email.as_deref())
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(username_conflict)?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    if let Some(groups) = &data.groups {
        replace_groups(&mut tx, id, groups).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM auth_user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
