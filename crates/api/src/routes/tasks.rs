//! Route definitions for the `/tasks` resource.

use axum::routing::{delete, patch, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// PATCH  /{id}/move     -> move_task
/// DELETE /{id}          -> archive_task (ADMIN+)
/// POST   /{id}/restore  -> restore_task (ADMIN+)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(tasks::archive_task))
        .route("/{id}/move", patch(tasks::move_task))
        .route("/{id}/restore", post(tasks::restore_task))
}
