//! Booking API
//!
//! | Prefix | Actions | Access |
//! |--------|---------|--------|
//! | /api/bookings | all | logged-in users |
//! | /api/class/bookings | all but partial_update | anyone |
//! | /api/generic/bookings | all | anyone |

mod resource;

pub use resource::BookingResource;

use axum::Router;

use crate::api::viewset::{Action, ViewSet};
use crate::auth::Permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let viewset = ViewSet::<BookingResource>::new("/api/bookings")
        .actions(Action::ALL, Permission::IsAuthenticated)
        .into_router();

    let class_views = ViewSet::<BookingResource>::new("/api/class/bookings")
        .actions(Action::WITHOUT_PATCH, Permission::AllowAny)
        .into_router();

    let generics = ViewSet::<BookingResource>::new("/api/generic/bookings")
        .actions(Action::ALL, Permission::AllowAny)
        .into_router();

    viewset.merge(class_views).merge(generics)
}
