//! Route definitions for the `/lists` resource.

use axum::routing::{patch, post, put};
use axum::Router;

use crate::handlers::lists;
use crate::state::AppState;

/// Routes mounted at `/lists`.
///
/// ```text
/// PATCH  /{id}               -> update_list
/// DELETE /{id}               -> delete_list (ADMIN+)
/// PUT    /{id}/flow-control  -> set_flow_control (ADMIN+)
/// POST   /{id}/tasks         -> create_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", patch(lists::update_list).delete(lists::delete_list))
        .route("/{id}/flow-control", put(lists::set_flow_control))
        .route("/{id}/tasks", post(lists::create_task))
}
