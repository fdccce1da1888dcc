//! Repository for the `lists` table.

use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::list::{BoardList, CreateList, UpdateList};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, color, position, is_archive, \
                        required_role_to_enter, required_role_to_leave, created_at, updated_at";

/// Provides CRUD operations for board lists.
pub struct ListRepo;

impl ListRepo {
    /// Insert an ordinary list after the project's last ordinary list.
    pub async fn create(pool: &PgPool, input: &CreateList) -> Result<BoardList, sqlx::Error> {
        let query = format!(
            "INSERT INTO lists (project_id, name, color, position)
             VALUES ($1, $2, $3, (
                 SELECT COALESCE(MAX(position), -1) + 1 FROM lists
                 WHERE project_id = $1 AND is_archive = false
             ))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardList>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find a list by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BoardList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE id = $1");
        sqlx::query_as::<_, BoardList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All lists of a project in board order (archive last).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<BoardList>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lists WHERE project_id = $1 ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, BoardList>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// The project's archive list.
    pub async fn find_archive(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<BoardList>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM lists WHERE project_id = $1 AND is_archive = true");
        sqlx::query_as::<_, BoardList>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Update name and/or colour. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateList,
    ) -> Result<Option<BoardList>, sqlx::Error> {
        let query = format!(
            "UPDATE lists SET
                name = COALESCE($2, name),
                color = COALESCE($3, color),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardList>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Replace both flow-control role sets.
    pub async fn set_flow_control(
        pool: &PgPool,
        id: DbId,
        required_role_to_enter: &[String],
        required_role_to_leave: &[String],
    ) -> Result<Option<BoardList>, sqlx::Error> {
        let query = format!(
            "UPDATE lists SET
                required_role_to_enter = $2,
                required_role_to_leave = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardList>(&query)
            .bind(id)
            .bind(required_role_to_enter)
            .bind(required_role_to_leave)
            .fetch_optional(pool)
            .await
    }

    /// Move every task of `id` into `archive_list_id`, then delete the list.
    ///
    /// Returns the number of tasks archived.
    pub async fn delete_into_archive(
        pool: &PgPool,
        id: DbId,
        archive_list_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let moved = sqlx::query(
            "UPDATE tasks SET list_id = $2, archived_at = NOW(), updated_at = NOW()
             WHERE list_id = $1",
        )
        .bind(id)
        .bind(archive_list_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM lists WHERE id = $1 AND is_archive = false")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(moved.rows_affected())
    }
}
