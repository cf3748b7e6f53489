//! Group Repository
//!
//! Groups are referenced by id from user payloads; they are created at
//! startup from configuration.

use super::{RepoError, RepoResult};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Id of the group called `name`, creating it when missing
pub async fn ensure(pool: &SqlitePool, name: &str) -> RepoResult<i64> {
    sqlx::query("INSERT OR IGNORE INTO auth_group (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM auth_group WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

/// Fail on the first id that names no group
pub(crate) async fn check_exist(
    tx: &mut Transaction<'_, Sqlite>,
    ids: &[i64],
) -> RepoResult<()> {
    for id in ids {
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM auth_group WHERE id = ?")
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        if found == 0 {
            return Err(RepoError::Conflict {
                field: "groups",
                message: format!("Invalid pk \"{id}\" - object does not exist."),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let db = DbService::in_memory().await.unwrap();
        let first = ensure(&db.pool, "Manager").await.unwrap();
        let again = ensure(&db.pool, "Manager").await.unwrap();
        let other = ensure(&db.pool, "Delivery crew").await.unwrap();
        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn test_unknown_id_is_field_conflict() {
        let db = DbService::in_memory().await.unwrap();
        let id = ensure(&db.pool, "Manager").await.unwrap();
        let mut tx = db.pool.begin().await.unwrap();
        check_exist(&mut tx, &[id]).await.unwrap();

        let err = check_exist(&mut tx, &[id, 99]).await.unwrap_err();
        match err {
            RepoError::Conflict { field, message } => {
                assert_eq!(field, "groups");
                assert_eq!(message, "Invalid pk \"99\" - object does not exist.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
