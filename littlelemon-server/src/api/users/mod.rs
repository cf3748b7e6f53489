//! User API
//!
//! | Prefix | Actions | Access |
//! |--------|---------|--------|
//! | /api/users | all | read: logged-in users, write: staff |
//! | /api/function/users | all but partial_update | anyone |
//! | /api/generic/users | all | anyone |

mod resource;

pub use resource::{UserResource, detail_path};

use axum::Router;

use crate::api::viewset::{Action, ViewSet};
use crate::auth::Permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let viewset = ViewSet::<UserResource>::new("/api/users")
        .actions(Action::READ, Permission::IsAuthenticated)
        .actions(Action::WRITE, Permission::IsAdminUser)
        .into_router();

    let function_views = ViewSet::<UserResource>::new("/api/function/users")
        .actions(Action::WITHOUT_PATCH, Permission::AllowAny)
        .into_router();

    let generics = ViewSet::<UserResource>::new("/api/generic/users")
        .actions(Action::ALL, Permission::AllowAny)
        .into_router();

    viewset.merge(function_views).merge(generics)
}
