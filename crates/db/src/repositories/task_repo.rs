//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskPlacement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, list_id, title, description, position, archived_at, \
                        created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task at the end of its list.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, list_id, title, description, position)
             VALUES ($1, $2, $3, $4, (
                 SELECT COALESCE(MAX(position), -1) + 1 FROM tasks WHERE list_id = $2
             ))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(input.list_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a task by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a task's list, position, and archive stamp.
    ///
    /// A `None` position appends after the other tasks in the target list.
    pub async fn place(
        pool: &PgPool,
        id: DbId,
        placement: &TaskPlacement,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                list_id = $2,
                position = COALESCE($3, (
                    SELECT COALESCE(MAX(t.position), -1) + 1 FROM tasks t
                    WHERE t.list_id = $2 AND t.id <> $1
                )),
                archived_at = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(placement.list_id)
            .bind(placement.position)
            .bind(placement.archived_at)
            .fetch_optional(pool)
            .await
    }
}
