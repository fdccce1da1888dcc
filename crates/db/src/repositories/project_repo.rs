//! Repository for the `projects` and `project_members` tables.

use sqlx::PgPool;
use taskflow_core::roles::{ProjectRole, ROLE_OWNER};
use taskflow_core::types::DbId;

use crate::models::project::{CreateProject, Project, ARCHIVE_POSITION, DEFAULT_LISTS};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides project and membership operations.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a project with its owner membership and default lists.
    ///
    /// Runs in one transaction so a project never exists without its
    /// archive list.
    pub async fn create_with_defaults(
        pool: &PgPool,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("INSERT INTO projects (name) VALUES ($1) RETURNING {COLUMNS}");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(project.id)
            .bind(input.owner_id)
            .bind(ROLE_OWNER)
            .execute(&mut *tx)
            .await?;

        for (index, (name, color, is_archive)) in DEFAULT_LISTS.iter().enumerate() {
            let position = if *is_archive {
                ARCHIVE_POSITION
            } else {
                index as i32
            };
            sqlx::query(
                "INSERT INTO lists (project_id, name, color, position, is_archive)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(project.id)
            .bind(*name)
            .bind(*color)
            .bind(position)
            .bind(*is_archive)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Add a member or change an existing member's role.
    pub async fn upsert_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        role: ProjectRole,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_project_members_project_user
             DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The stored role name of `user_id` in `project_id`, if a member.
    pub async fn find_member_role(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
