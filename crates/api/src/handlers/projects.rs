//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskflow_core::error::CoreError;
use taskflow_core::roles::{ProjectRole, UnknownRole};
use taskflow_core::types::DbId;
use taskflow_db::models::list::{BoardList, CreateList};
use taskflow_db::models::project::{CreateProject, Project};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::require_project_role;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

/// Request body for `POST /projects/{id}/lists`.
#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
    pub color: Option<String>,
}

/// Request body for `PUT /projects/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct UpsertMemberRequest {
    pub user_id: DbId,
    pub role: String,
}

/// Trimmed, non-empty name or a validation error naming `field`.
pub(crate) fn required_name(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(trimmed.to_string())
}

/// POST /api/v1/projects
///
/// The caller becomes OWNER. Default lists and the archive list are created
/// with the project.
pub async fn create_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let name = required_name(&input.name, "Project name")?;
    let project = state
        .board
        .create_project(&CreateProject {
            name,
            owner_id: auth_user.user_id,
        })
        .await?;

    tracing::info!(project_id = project.id, user_id = auth_user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}/lists
pub async fn list_lists(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BoardList>>>> {
    require_project_role(&state, auth_user.user_id, project_id, None).await?;
    let lists = state.board.lists_for_project(project_id).await?;
    Ok(Json(DataResponse { data: lists }))
}

/// POST /api/v1/projects/{id}/lists
///
/// New lists are ordinary and unrestricted; they go after the last ordinary list.
pub async fn create_list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateListRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BoardList>>)> {
    require_project_role(&state, auth_user.user_id, project_id, None).await?;
    let name = required_name(&input.name, "List name")?;

    let list = state
        .board
        .create_list(&CreateList {
            project_id,
            name,
            color: input.color,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// PUT /api/v1/projects/{id}/members
///
/// Add a member or change a member's role. ADMIN or higher; nobody can grant
/// a role above their own.
pub async fn upsert_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<UpsertMemberRequest>,
) -> AppResult<StatusCode> {
    let caller_role = require_project_role(
        &state,
        auth_user.user_id,
        project_id,
        Some(ProjectRole::Admin),
    )
    .await?;

    let role: ProjectRole = input
        .role
        .parse()
        .map_err(|e: UnknownRole| AppError::Core(CoreError::Validation(e.to_string())))?;

    if !caller_role.at_least(role) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Cannot grant {role} as {caller_role}"
        ))));
    }

    if let Some(current) = state
        .board
        .find_member_role(project_id, input.user_id)
        .await?
    {
        if !caller_role.at_least(current) {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Cannot change the role of a {current} as {caller_role}"
            ))));
        }
    }

    state
        .board
        .upsert_member(project_id, input.user_id, role)
        .await?;
    tracing::info!(project_id, member_id = input.user_id, %role, "Project member updated");
    Ok(StatusCode::NO_CONTENT)
}
