//! Menu resource

use async_trait::async_trait;
use serde_json::Value;
use shared::FieldErrors;
use shared::models::{MenuItem, MenuItemInput};
use sqlx::SqlitePool;

use crate::api::extract::RequestContext;
use crate::api::viewset::Resource;
use crate::db::repository::{ListQuery, RepoResult, menu};

pub struct MenuResource;

#[async_trait]
impl Resource for MenuResource {
    type Model = MenuItem;
    type Input = MenuItemInput;
    type Repr = MenuItem;

    const NAME: &'static str = "Menu";

    async fn list(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<MenuItem>> {
        menu::find_all(pool, query).await
    }

    async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64> {
        menu::count(pool, query).await
    }

    async fn find(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
        menu::find_by_id(pool, id).await
    }

    async fn create(pool: &SqlitePool, input: MenuItemInput) -> RepoResult<MenuItem> {
        menu::create(pool, input).await
    }

    async fn update(pool: &SqlitePool, id: i64, input: MenuItemInput) -> RepoResult<MenuItem> {
        menu::update(pool, id, input).await
    }

    async fn destroy(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
        menu::delete(pool, id).await
    }

    fn parse(payload: &Value, base: Option<&MenuItem>) -> Result<MenuItemInput, FieldErrors> {
        MenuItemInput::from_payload(payload, base)
    }

    fn represent(model: MenuItem, _ctx: &RequestContext) -> MenuItem {
        model
    }
}
