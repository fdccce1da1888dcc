//! Route definitions for the `/projects` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST /                -> create_project
/// GET  /{id}/lists      -> list_lists
/// POST /{id}/lists      -> create_list
/// PUT  /{id}/members    -> upsert_member (ADMIN+)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(projects::create_project))
        .route(
            "/{id}/lists",
            get(projects::list_lists).post(projects::create_list),
        )
        .route("/{id}/members", put(projects::upsert_member))
}
