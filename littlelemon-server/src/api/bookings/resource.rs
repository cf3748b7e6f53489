//! Booking resource

use async_trait::async_trait;
use serde_json::Value;
use shared::FieldErrors;
use shared::models::{Booking, BookingInput};
use sqlx::SqlitePool;

use crate::api::extract::RequestContext;
use crate::api::viewset::Resource;
use crate::db::repository::{ListQuery, RepoResult, booking};

pub struct BookingResource;

#[async_trait]
impl Resource for BookingResource {
    type Model = Booking;
    type Input = BookingInput;
    type Repr = Booking;

    const NAME: &'static str = "Booking";

    async fn list(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<Booking>> {
        booking::find_all(pool, query).await
    }

    async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64> {
        booking::count(pool, query).await
    }

    async fn find(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
        booking::find_by_id(pool, id).await
    }

    async fn create(pool: &SqlitePool, input: BookingInput) -> RepoResult<Booking> {
        booking::create(pool, input).await
    }

    async fn update(pool: &SqlitePool, id: i64, input: BookingInput) -> RepoResult<Booking> {
        booking::update(pool, id, input).await
    }

    async fn destroy(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
        booking::delete(pool, id).await
    }

    fn parse(payload: &Value, base: Option<&Booking>) -> Result<BookingInput, FieldErrors> {
        BookingInput::from_payload(payload, base)
    }

    fn represent(model: Booking, _ctx: &RequestContext) -> Booking {
        model
    }
}
