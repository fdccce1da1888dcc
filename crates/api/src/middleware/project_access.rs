//! Project membership checks.
//!
//! Resources are addressed by their own ids (`/lists/{id}`, `/tasks/{id}`),
//! so the project is only known after loading the row. Handlers load it and
//! then call [`require_project_role`].

use taskflow_core::error::CoreError;
use taskflow_core::roles::ProjectRole;
use taskflow_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Resolve the caller's role in `project_id`, rejecting non-members.
///
/// With `min` set, the role must also rank at least that high in the
/// administrative hierarchy (`OWNER > ADMIN > MEMBER`). Flow-control role
/// sets are a separate mechanism and are not checked here.
pub async fn require_project_role(
    state: &AppState,
    user_id: DbId,
    project_id: DbId,
    min: Option<ProjectRole>,
) -> AppResult<ProjectRole> {
    let role = state
        .board
        .find_member_role(project_id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "You are not a member of this project".into(),
            ))
        })?;

    if let Some(min) = min {
        if !role.at_least(min) {
            tracing::debug!(user_id, project_id, %role, required = %min, "Project role too low");
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "{min} role or higher required"
            ))));
        }
    }

    Ok(role)
}
