//! Menu Repository
//!
//! Prices are stored as TEXT and parsed back into [`Decimal`].

use super::{ListQuery, RepoError, RepoResult};
use rust_decimal::Decimal;
use shared::models::{MenuItem, MenuItemInput};
use sqlx::SqlitePool;
use std::str::FromStr;

const COLUMNS: &str = "id, title, price, inventory";

#[derive(sqlx::FromRow)]
struct MenuRow {
    id: i64,
    title: String,
    price: String,
    inventory: i32,
}

impl TryFrom<MenuRow> for MenuItem {
    type Error = RepoError;

    fn try_from(row: MenuRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price).map_err(|e| {
            RepoError::Database(format!("Corrupt price {:?} for menu {}: {e}", row.price, row.id))
        })?;
        Ok(MenuItem {
            id: row.id,
            title: row.title,
            price,
            inventory: row.inventory,
        })
    }
}

pub async fn find_all(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM restaurant_menu \
         WHERE ?1 IS NULL OR title LIKE ?1 ESCAPE '\\' \
         ORDER BY title, id LIMIT ?2 OFFSET ?3"
    );
    sqlx::query_as::<_, MenuRow>(&sql)
        .bind(query.pattern())
        .bind(query.limit())
        .bind(query.offset)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(MenuItem::try_from)
        .collect()
}

pub async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM restaurant_menu WHERE ?1 IS NULL OR title LIKE ?1 ESCAPE '\\'",
    )
    .bind(query.pattern())
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurant_menu WHERE id = ?");
    sqlx::query_as::<_, MenuRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(MenuItem::try_from)
        .transpose()
}

pub async fn create(pool: &SqlitePool, data: MenuItemInput) -> RepoResult<MenuItem> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO restaurant_menu (title, price, inventory) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&data.title)
    .bind(data.price.to_string())
    .bind(data.inventory)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemInput) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE restaurant_menu SET title = ?1, price = ?2, inventory = ?3 WHERE id = ?4",
    )
    .bind(&data.title)
    .bind(data.price.to_string())
    .bind(data.inventory)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM restaurant_menu WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
