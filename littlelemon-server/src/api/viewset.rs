//! Generic CRUD over a [`Resource`]
//!
//! Every resource is served by the same six handlers. A [`ViewSet`]
//! mounts a chosen subset of them under a URL prefix, each action guarded
//! by its own [`Permission`]:
//!
//! | Action | Route | Success |
//! |--------|-------|---------|
//! | list | `GET {prefix}` | 200 |
//! | create | `POST {prefix}` | 201 |
//! | retrieve | `GET {prefix}/{id}` | 200 |
//! | update | `PUT {prefix}/{id}` | 200 |
//! | partial_update | `PATCH {prefix}/{id}` | 200 |
//! | destroy | `DELETE {prefix}/{id}` | 204 |

use std::marker::PhantomData;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::FieldErrors;
use sqlx::SqlitePool;

use super::extract::{JsonBody, RequestContext};
use super::pagination::Page;
use crate::auth::{Permission, require_permission};
use crate::core::ServerState;
use crate::db::repository::{ListQuery, RepoResult};
use crate::utils::{AppError, AppResult};

// ========== Actions ==========

/// Standard viewset action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::List,
        Action::Create,
        Action::Retrieve,
        Action::Update,
        Action::PartialUpdate,
        Action::Destroy,
    ];
    /// `list` and `retrieve`
    pub const READ: [Action; 2] = [Action::List, Action::Retrieve];
    /// `create`, `update`, `partial_update` and `destroy`
    pub const WRITE: [Action; 4] = [
        Action::Create,
        Action::Update,
        Action::PartialUpdate,
        Action::Destroy,
    ];
    /// Everything but `partial_update`
    pub const WITHOUT_PATCH: [Action; 5] = [
        Action::List,
        Action::Create,
        Action::Retrieve,
        Action::Update,
        Action::Destroy,
    ];

    /// Whether the action addresses a single object (`{prefix}/{id}`)
    pub fn is_detail(self) -> bool {
        !matches!(self, Action::List | Action::Create)
    }

    pub fn method(self) -> MethodFilter {
        match self {
            Action::List | Action::Retrieve => MethodFilter::GET,
            Action::Create => MethodFilter::POST,
            Action::Update => MethodFilter::PUT,
            Action::PartialUpdate => MethodFilter::PATCH,
            Action::Destroy => MethodFilter::DELETE,
        }
    }
}

// ========== Resource ==========

/// A model served through the generic handlers
///
/// Implementors wire the repository functions and the payload validation
/// of one model together.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Model: Send + Sync;
    type Input: Send;
    type Repr: Serialize + Send;

    /// Model name used in "No X matches the given query."
    const NAME: &'static str;

    async fn list(pool: &SqlitePool, query: &ListQuery) -> RepoResult<Vec<Self::Model>>;
    async fn count(pool: &SqlitePool, query: &ListQuery) -> RepoResult<i64>;
    async fn find(pool: &SqlitePool, id: i64) -> RepoResult<Option<Self::Model>>;
    async fn create(pool: &SqlitePool, input: Self::Input) -> RepoResult<Self::Model>;
    async fn update(pool: &SqlitePool, id: i64, input: Self::Input) -> RepoResult<Self::Model>;
    async fn destroy(pool: &SqlitePool, id: i64) -> RepoResult<bool>;

    /// Validate a payload; `base` is the stored object for partial updates
    fn parse(payload: &Value, base: Option<&Self::Model>) -> Result<Self::Input, FieldErrors>;

    /// Public representation of a model
    fn represent(model: Self::Model, ctx: &RequestContext) -> Self::Repr;
}

fn not_found<R: Resource>() -> AppError {
    AppError::not_found(format!("No {} matches the given query.", R::NAME))
}

/// Load the object addressed by a raw path id; non-integer ids are 404 too
async fn get_object<R: Resource>(pool: &SqlitePool, raw_id: &str) -> AppResult<(i64, R::Model)> {
    let id: i64 = raw_id.parse().map_err(|_| not_found::<R>())?;
    let model = R::find(pool, id).await?.ok_or_else(not_found::<R>)?;
    Ok((id, model))
}

// ========== Handlers ==========

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    fn query(&self) -> ListQuery {
        ListQuery {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            ..ListQuery::default()
        }
    }
}

/// GET {prefix} - plain array, or a page envelope when pagination is on
pub async fn list<R: Resource>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let pool = state.pool();
    let query = params.query();

    let Some(size) = state.config().page_size else {
        let items: Vec<R::Repr> = R::list(pool, &query)
            .await?
            .into_iter()
            .map(|m| R::represent(m, &ctx))
            .collect();
        return Ok(Json(items).into_response());
    };

    let count = R::count(pool, &query).await?;
    let page = Page::resolve(params.page.as_deref(), size, count)?;
    let items: Vec<R::Repr> = R::list(pool, &page.window(query))
        .await?
        .into_iter()
        .map(|m| R::represent(m, &ctx))
        .collect();
    Ok(Json(page.paginate(count, items, &ctx)).into_response())
}

/// POST {prefix}
pub async fn create<R: Resource>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    JsonBody(payload): JsonBody,
) -> AppResult<Response> {
    let input = R::parse(&payload, None)?;
    let model = R::create(state.pool(), input).await?;
    tracing::info!(resource = R::NAME, "Object created");
    Ok((StatusCode::CREATED, Json(R::represent(model, &ctx))).into_response())
}

/// GET {prefix}/{id}
pub async fn retrieve<R: Resource>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<R::Repr>> {
    let (_, model) = get_object::<R>(state.pool(), &id).await?;
    Ok(Json(R::represent(model, &ctx)))
}

/// PUT {prefix}/{id} - every writable field is required
pub async fn update<R: Resource>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> AppResult<Json<R::Repr>> {
    let (id, _) = get_object::<R>(state.pool(), &id).await?;
    let input = R::parse(&payload, None)?;
    let model = R::update(state.pool(), id, input).await?;
    tracing::info!(resource = R::NAME, id, "Object updated");
    Ok(Json(R::represent(model, &ctx)))
}

/// PATCH {prefix}/{id} - absent fields keep their stored values
pub async fn partial_update<R: Resource>(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> AppResult<Json<R::Repr>> {
    let (id, existing) = get_object::<R>(state.pool(), &id).await?;
    let input = R::parse(&payload, Some(&existing))?;
    let model = R::update(state.pool(), id, input).await?;
    tracing::info!(resource = R::NAME, id, "Object partially updated");
    Ok(Json(R::represent(model, &ctx)))
}

/// DELETE {prefix}/{id}
pub async fn destroy<R: Resource>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let (id, _) = get_object::<R>(state.pool(), &id).await?;
    if !R::destroy(state.pool(), id).await? {
        return Err(not_found::<R>());
    }
    tracing::info!(resource = R::NAME, id, "Object deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn handler<R: Resource>(action: Action) -> MethodRouter<ServerState> {
    let filter = action.method();
    match action {
        Action::List => MethodRouter::new().on(filter, list::<R>),
        Action::Create => MethodRouter::new().on(filter, create::<R>),
        Action::Retrieve => MethodRouter::new().on(filter, retrieve::<R>),
        Action::Update => MethodRouter::new().on(filter, update::<R>),
        Action::PartialUpdate => MethodRouter::new().on(filter, partial_update::<R>),
        Action::Destroy => MethodRouter::new().on(filter, destroy::<R>),
    }
}

// ========== Router builder ==========

/// Routes of one resource under one prefix
///
/// # Usage
///
/// ```ignore
/// ViewSet::<MenuResource>::new("/api/menu")
///     .actions(Action::READ, Permission::AllowAny)
///     .actions(Action::WRITE, Permission::IsAdminUser)
///     .into_router()
/// ```
pub struct ViewSet<R: Resource> {
    prefix: &'static str,
    actions: Vec<(Action, Permission)>,
    _resource: PhantomData<R>,
}

impl<R: Resource> ViewSet<R> {
    /// `prefix` has no trailing slash, e.g. `/api/menu`
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            actions: Vec::new(),
            _resource: PhantomData,
        }
    }

    pub fn action(mut self, action: Action, permission: Permission) -> Self {
        self.actions.retain(|(a, _)| *a != action);
        self.actions.push((action, permission));
        self
    }

    pub fn actions(self, actions: impl IntoIterator<Item = Action>, permission: Permission) -> Self {
        actions
            .into_iter()
            .fold(self, |viewset, action| viewset.action(action, permission))
    }

    /// One route group per permission, merged
    pub fn into_router(self) -> Router<ServerState> {
        let detail_path = format!("{}/{{id}}", self.prefix);
        let mut router = Router::new();

        for permission in [
            Permission::AllowAny,
            Permission::IsAuthenticated,
            Permission::IsAdminUser,
        ] {
            let mut collection: Option<MethodRouter<ServerState>> = None;
            let mut detail: Option<MethodRouter<ServerState>> = None;
            for (action, _) in self.actions.iter().filter(|(_, p)| *p == permission) {
                let slot = if action.is_detail() {
                    &mut detail
                } else {
                    &mut collection
                };
                let route = handler::<R>(*action);
                *slot = Some(match slot.take() {
                    Some(existing) => existing.merge(route),
                    None => route,
                });
            }
            if collection.is_none() && detail.is_none() {
                continue;
            }

            let mut group = Router::new();
            if let Some(collection) = collection {
                group = group.route(self.prefix, collection);
            }
            if let Some(detail) = detail {
                group = group.route(&detail_path, detail);
            }
            if permission != Permission::AllowAny {
                group = group.route_layer(middleware::from_fn(require_permission(permission)));
            }
            router = router.merge(group);
        }

        router
    }
}
