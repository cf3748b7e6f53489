//! Booking Repository

use super::{ListQuery, RepoError, RepoResult};
use shared::models::{Booking, BookingInput};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, no_of_guests, booking_date";

pub async fn find_all(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<Booking>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM restaurant_booking \
         WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\' \
         ORDER BY booking_date, id LIMIT ?2 OFFSET ?3"
    );
    let bookings = sqlx::query_as::<_, Booking>(&sql)
        .bind(query.pattern())
        .bind(query.limit())
        .bind(query.offset)
        .fetch_all(pool)
        .await?;
    Ok(bookings)
}

pub async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM restaurant_booking WHERE ?1 IS NULL OR name LIKE ?1 ESCAPE '\\'",
    )
    .bind(query.pattern())
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurant_booking WHERE id = ?");
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(booking)
}

pub async fn create(pool: &SqlitePool, data: BookingInput) -> RepoResult<Booking> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO restaurant_booking (name, no_of_guests, booking_date) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.no_of_guests)
    .bind(data.booking_date)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create booking".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BookingInput) -> RepoResult<Booking> {
    let rows = sqlx::query(
        "UPDATE restaurant_booking SET name = ?1, no_of_guests = ?2, booking_date = ?3 WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(data.no_of_guests)
    .bind(data.booking_date)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM restaurant_booking WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
