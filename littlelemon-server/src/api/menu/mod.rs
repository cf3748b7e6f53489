//! Menu API
//!
//! | Prefix | Actions | Access |
//! |--------|---------|--------|
//! | /api/menu | all | read: anyone, write: staff |
//! | /api/menu-readonly | list, retrieve | anyone |
//! | /api/mixin/menu | all but partial_update | anyone |

mod resource;

pub use resource::MenuResource;

use axum::Router;

use crate::api::viewset::{Action, ViewSet};
use crate::auth::Permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let viewset = ViewSet::<MenuResource>::new("/api/menu")
        .actions(Action::READ, Permission::AllowAny)
        .actions(Action::WRITE, Permission::IsAdminUser)
        .into_router();

    let readonly = ViewSet::<MenuResource>::new("/api/menu-readonly")
        .actions(Action::READ, Permission::AllowAny)
        .into_router();

    let mixins = ViewSet::<MenuResource>::new("/api/mixin/menu")
        .actions(Action::WITHOUT_PATCH, Permission::AllowAny)
        .into_router();

    viewset.merge(readonly).merge(mixins)
}
