pub mod auth;
pub mod health;
pub mod lists;
pub mod projects;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/refresh                      rotate refresh cookie
/// /auth/logout                       revoke cookie's family
/// /auth/logout-all                   revoke every family (requires auth)
/// /auth/me                           caller identity (requires auth)
///
/// /projects                          create
/// /projects/{id}/lists               list, create (member)
/// /projects/{id}/members             add / change role (ADMIN+)
///
/// /lists/{id}                        update (member), delete (ADMIN+)
/// /lists/{id}/flow-control           set role sets (ADMIN+)
/// /lists/{id}/tasks                  create task (member)
///
/// /tasks/{id}                        archive (ADMIN+)
/// /tasks/{id}/move                   move (member, flow control)
/// /tasks/{id}/restore                restore (ADMIN+)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/lists", lists::router())
        .nest("/tasks", tasks::router())
}
