//! Handlers for the `/tasks` resource: move, archive, restore.
//!
//! Moves are user-initiated and go through list flow control. Archive and
//! restore are administrative transitions into and out of the archive list;
//! they require ADMIN and never consult flow control.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use taskflow_core::error::CoreError;
use taskflow_core::flow_control::{authorize_move, ListFlowRules, MoveKind};
use taskflow_core::roles::ProjectRole;
use taskflow_core::types::DbId;
use taskflow_db::models::list::BoardList;
use taskflow_db::models::task::{Task, TaskPlacement};

use crate::error::{AppError, AppResult};
use crate::handlers::lists::load_list;
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::require_project_role;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /tasks/{id}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub list_id: DbId,
    /// Target position; omitted appends to the end of the list.
    pub position: Option<i32>,
}

/// Request body for `POST /tasks/{id}/restore`.
#[derive(Debug, Default, Deserialize)]
pub struct RestoreTaskRequest {
    /// Destination list; defaults to the project's first ordinary list.
    pub list_id: Option<DbId>,
}

async fn load_task(state: &AppState, id: DbId) -> AppResult<Task> {
    state
        .board
        .find_task(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

async fn place(state: &AppState, id: DbId, placement: TaskPlacement) -> AppResult<Task> {
    state
        .board
        .place_task(id, &placement)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

/// Flow-control view of a stored list. A role set this build cannot read
/// refuses the move instead of being treated as unrestricted.
fn flow_rules_of(list: &BoardList) -> AppResult<ListFlowRules> {
    list.flow_rules().map_err(|e| {
        tracing::warn!(list_id = list.id, error = %e, "Unreadable flow-control role set");
        AppError::Core(CoreError::Internal(format!(
            "List {} has an unreadable role set: {e}",
            list.id
        )))
    })
}

/// PATCH /api/v1/tasks/{id}/move
///
/// Reorder within a list, or transfer to another list of the same project
/// subject to both lists' flow-control role sets.
pub async fn move_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MoveTaskRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    if input.position.is_some_and(|p| p < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Position must not be negative".into(),
        )));
    }

    let task = load_task(&state, id).await?;
    let role = require_project_role(&state, auth_user.user_id, task.project_id, None).await?;

    let source = load_list(&state, task.list_id).await?;
    let target = load_list(&state, input.list_id).await?;
    if target.project_id != task.project_id {
        return Err(AppError::Core(CoreError::Validation(
            "Target list belongs to a different project".into(),
        )));
    }

    let (source_rules, target_rules) = (flow_rules_of(&source)?, flow_rules_of(&target)?);
    let kind = authorize_move(&source_rules, &target_rules, role).inspect_err(|e| {
        tracing::info!(
            task_id = id,
            user_id = auth_user.user_id,
            %role,
            from = source.id,
            to = target.id,
            error = %e,
            "Task move rejected"
        );
    })?;

    let moved = place(
        &state,
        id,
        TaskPlacement {
            list_id: target.id,
            position: input.position,
            archived_at: task.archived_at,
        },
    )
    .await?;

    if kind == MoveKind::Transfer {
        tracing::debug!(task_id = id, from = source.id, to = target.id, "Task moved");
    }
    Ok(Json(DataResponse { data: moved }))
}

/// DELETE /api/v1/tasks/{id}
///
/// Soft-delete: move the task into the project's archive list. ADMIN or higher.
pub async fn archive_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load_task(&state, id).await?;
    require_project_role(
        &state,
        auth_user.user_id,
        task.project_id,
        Some(ProjectRole::Admin),
    )
    .await?;

    if task.archived_at.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Task is already archived".into(),
        )));
    }

    let archive = state
        .board
        .find_archive_list(task.project_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Project {} has no archive list",
                task.project_id
            )))
        })?;

    let archived = place(
        &state,
        id,
        TaskPlacement {
            list_id: archive.id,
            position: None,
            archived_at: Some(Utc::now()),
        },
    )
    .await?;

    tracing::info!(task_id = id, user_id = auth_user.user_id, "Task archived");
    Ok(Json(DataResponse { data: archived }))
}

/// POST /api/v1/tasks/{id}/restore
///
/// Move an archived task back to an ordinary list. ADMIN or higher.
pub async fn restore_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RestoreTaskRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load_task(&state, id).await?;
    require_project_role(
        &state,
        auth_user.user_id,
        task.project_id,
        Some(ProjectRole::Admin),
    )
    .await?;

    if task.archived_at.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Task is not archived".into(),
        )));
    }

    let target = match input.list_id {
        Some(list_id) => {
            let list = load_list(&state, list_id).await?;
            if list.project_id != task.project_id || list.is_archive {
                return Err(AppError::Core(CoreError::Validation(
                    "Tasks can only be restored into an ordinary list of the same project".into(),
                )));
            }
            list
        }
        None => state
            .board
            .lists_for_project(task.project_id)
            .await?
            .into_iter()
            .find(|l| !l.is_archive)
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Project has no list to restore into".into(),
                ))
            })?,
    };

    let restored = place(
        &state,
        id,
        TaskPlacement {
            list_id: target.id,
            position: None,
            archived_at: None,
        },
    )
    .await?;

    tracing::info!(task_id = id, list_id = target.id, user_id = auth_user.user_id, "Task restored");
    Ok(Json(DataResponse { data: restored }))
}
