//! Task model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
///
/// `archived_at` is set exactly while the task sits in its project's archive list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub list_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task at the end of a list.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: DbId,
    pub list_id: DbId,
    pub title: String,
    pub description: Option<String>,
}

/// Where a task should end up after a move, archive, or restore.
#[derive(Debug, Clone)]
pub struct TaskPlacement {
    pub list_id: DbId,
    /// Explicit position; `None` appends after the last active task.
    pub position: Option<i32>,
    pub archived_at: Option<Timestamp>,
}
