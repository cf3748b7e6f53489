//! User resource
//!
//! Accounts created here have no usable password; they log in only after
//! a password is set through registration.

use async_trait::async_trait;
use serde_json::Value;
use shared::FieldErrors;
use shared::models::{User, UserInput, UserView};
use sqlx::SqlitePool;

use crate::api::extract::RequestContext;
use crate::api::viewset::Resource;
use crate::db::repository::{ListQuery, RepoResult, user};

/// Path of the users viewset detail route
pub fn detail_path(id: i64) -> String {
    format!("/api/users/{id}/")
}

pub struct UserResource;

#[async_trait]
impl Resource for UserResource {
    type Model = User;
    type Input = UserInput;
    type Repr = UserView;

    const NAME: &'static str = "User";

    async fn list(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<User>> {
        user::find_all(pool, query).await
    }

    async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64> {
        user::count(pool, query).await
    }

    async fn find(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
        user::find_by_id(pool, id).await
    }

    async fn create(pool: &SqlitePool, input: UserInput) -> RepoResult<User> {
        user::create(pool, input).await
    }

    async fn update(pool: &SqlitePool, id: i64, input: UserInput) -> RepoResult<User> {
        user::update(pool, id, input).await
    }

    async fn destroy(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
        user::delete(pool, id).await
    }

    fn parse(payload: &Value, base: Option<&User>) -> Result<UserInput, FieldErrors> {
        UserInput::from_payload(payload, base)
    }

    fn represent(model: User, ctx: &RequestContext) -> UserView {
        let url = ctx.absolute(&detail_path(model.id));
        UserView::new(model, url)
    }
}
