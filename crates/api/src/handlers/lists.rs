//! Handlers for the `/lists` resource: edit, flow control, delete, add task.
//!
//! The archive list is fixed: it cannot be renamed, restricted, deleted, or
//! receive new tasks directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskflow_core::error::CoreError;
use taskflow_core::roles::ProjectRole;
use taskflow_core::types::DbId;
use taskflow_db::models::list::{BoardList, UpdateList};
use taskflow_db::models::task::{CreateTask, Task};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::required_name;
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::require_project_role;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /lists/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Request body for `PUT /lists/{id}/flow-control`. Empty sets mean "anyone".
#[derive(Debug, Deserialize)]
pub struct FlowControlRequest {
    #[serde(default)]
    pub required_role_to_enter: Vec<String>,
    #[serde(default)]
    pub required_role_to_leave: Vec<String>,
}

/// Request body for `POST /lists/{id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Result of deleting a list.
#[derive(Debug, Serialize)]
pub struct DeleteListResponse {
    pub id: DbId,
    /// Number of tasks moved into the archive list.
    pub archived_tasks: u64,
}

/// Load a list or fail with 404.
pub(crate) async fn load_list(state: &AppState, id: DbId) -> AppResult<BoardList> {
    state
        .board
        .find_list(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))
}

fn parse_roles(names: &[String]) -> AppResult<Vec<ProjectRole>> {
    names
        .iter()
        .map(|name| {
            name.parse::<ProjectRole>()
                .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
        })
        .collect()
}

/// PATCH /api/v1/lists/{id}
pub async fn update_list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateListRequest>,
) -> AppResult<Json<DataResponse<BoardList>>> {
    let list = load_list(&state, id).await?;
    require_project_role(&state, auth_user.user_id, list.project_id, None).await?;

    let name = input
        .name
        .as_deref()
        .map(|n| required_name(n, "List name"))
        .transpose()?;

    if list.is_archive && name.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "The archive list cannot be renamed".into(),
        )));
    }

    let updated = state
        .board
        .update_list(id, &UpdateList { name, color: input.color })
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/lists/{id}/flow-control
///
/// Replace both role sets of a list. ADMIN or higher.
pub async fn set_flow_control(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FlowControlRequest>,
) -> AppResult<Json<DataResponse<BoardList>>> {
    let list = load_list(&state, id).await?;
    require_project_role(
        &state,
        auth_user.user_id,
        list.project_id,
        Some(ProjectRole::Admin),
    )
    .await?;

    if list.is_archive {
        return Err(AppError::Core(CoreError::Validation(
            "Flow control cannot be configured on the archive list".into(),
        )));
    }

    let enter = parse_roles(&input.required_role_to_enter)?;
    let leave = parse_roles(&input.required_role_to_leave)?;

    let updated = state
        .board
        .set_flow_control(id, &enter, &leave)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))?;

    tracing::info!(
        list_id = id,
        user_id = auth_user.user_id,
        enter = ?updated.required_role_to_enter,
        leave = ?updated.required_role_to_leave,
        "List flow control updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/lists/{id}
///
/// Move the list's tasks into the archive, then delete it. ADMIN or higher.
pub async fn delete_list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeleteListResponse>>> {
    let list = load_list(&state, id).await?;
    require_project_role(
        &state,
        auth_user.user_id,
        list.project_id,
        Some(ProjectRole::Admin),
    )
    .await?;

    if list.is_archive {
        return Err(AppError::Core(CoreError::Validation(
            "The archive list cannot be deleted".into(),
        )));
    }

    let archive = state
        .board
        .find_archive_list(list.project_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Project {} has no archive list",
                list.project_id
            )))
        })?;

    let archived_tasks = state.board.delete_list(id, archive.id).await?;
    tracing::info!(list_id = id, archived_tasks, "List deleted");

    Ok(Json(DataResponse {
        data: DeleteListResponse { id, archived_tasks },
    }))
}

/// POST /api/v1/lists/{id}/tasks
pub async fn create_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let list = load_list(&state, id).await?;
    require_project_role(&state, auth_user.user_id, list.project_id, None).await?;

    if list.is_archive {
        return Err(AppError::Core(CoreError::Validation(
            "Tasks cannot be created in the archive list".into(),
        )));
    }

    let title = required_name(&input.title, "Task title")?;
    let task = state
        .board
        .create_task(&CreateTask {
            project_id: list.project_id,
            list_id: list.id,
            title,
            description: input.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}
