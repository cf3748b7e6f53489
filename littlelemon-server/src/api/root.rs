//! Landing page and API root
//!
//! Both are mounted at `/` and under `/restaurant`; links stay inside the
//! prefix the page was requested under.

use axum::{Json, Router, extract::State, response::Html, routing::get};
use serde::Serialize;
use tera::Context;

use crate::api::extract::RequestContext;
use crate::api::templates;
use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(index))
        .route("/api", get(api_root))
}

/// Mount prefix of a restaurant page: `""` or `"/restaurant"`
fn mount_prefix(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.strip_suffix("/api").unwrap_or(path)
}

/// GET /
pub async fn index(State(state): State<ServerState>, ctx: RequestContext) -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("prefix", mount_prefix(&ctx.path));
    templates::render(state.templates(), templates::INDEX, &context)
}

/// List URL of every viewset
#[derive(Debug, Serialize)]
pub struct ApiRoot {
    pub users: String,
    pub bookings: String,
    pub menu: String,
    #[serde(rename = "menu-readonly")]
    pub menu_readonly: String,
}

/// GET /api
pub async fn api_root(ctx: RequestContext) -> Json<ApiRoot> {
    let prefix = mount_prefix(&ctx.path);
    let link = |resource: &str| ctx.absolute(&format!("{prefix}/api/{resource}/"));
    Json(ApiRoot {
        users: link("users"),
        bookings: link("bookings"),
        menu: link("menu"),
        menu_readonly: link("menu-readonly"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_prefix() {
        assert_eq!(mount_prefix("/"), "");
        assert_eq!(mount_prefix("/api"), "");
        assert_eq!(mount_prefix("/api/"), "");
        assert_eq!(mount_prefix("/restaurant"), "/restaurant");
        assert_eq!(mount_prefix("/restaurant/api"), "/restaurant");
    }
}
