//! Postgres adapter: implements the store ports by delegating to the repositories.

use async_trait::async_trait;
use taskflow_core::roles::{role_set_names, ProjectRole};
use taskflow_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::list::{BoardList, CreateList, UpdateList};
use crate::models::project::{CreateProject, Project};
use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};
use crate::models::task::{CreateTask, Task, TaskPlacement};
use crate::models::user::{CreateUser, User};
use crate::repositories::{ListRepo, ProjectRepo, RefreshTokenRepo, TaskRepo, UserRepo};
use crate::store::{BoardStore, StoreResult, TokenStore};
use crate::DbPool;

/// Store backed by a shared sqlx connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn record_failed_login(&self, id: DbId, lock_until: Option<Timestamp>) -> StoreResult<()> {
        Ok(UserRepo::record_failed_login(&self.pool, id, lock_until).await?)
    }

    async fn record_successful_login(&self, id: DbId) -> StoreResult<()> {
        Ok(UserRepo::record_successful_login(&self.pool, id).await?)
    }

    async fn insert_refresh_token(&self, input: &CreateRefreshToken) -> StoreResult<RefreshToken> {
        Ok(RefreshTokenRepo::create(&self.pool, input).await?)
    }

    async fn find_refresh_token(&self, token_hash: &str) -> StoreResult<Option<RefreshToken>> {
        Ok(RefreshTokenRepo::find_by_hash(&self.pool, token_hash).await?)
    }

    async fn rotate_refresh_token(
        &self,
        current_id: DbId,
        next: &CreateRefreshToken,
    ) -> StoreResult<Option<RefreshToken>> {
        Ok(RefreshTokenRepo::rotate(&self.pool, current_id, next).await?)
    }

    async fn revoke_refresh_token(&self, id: DbId) -> StoreResult<bool> {
        Ok(RefreshTokenRepo::revoke(&self.pool, id).await?)
    }

    async fn revoke_family(&self, family: Uuid) -> StoreResult<u64> {
        Ok(RefreshTokenRepo::revoke_family(&self.pool, family).await?)
    }

    async fn revoke_all_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        Ok(RefreshTokenRepo::revoke_all_for_user(&self.pool, user_id).await?)
    }

    async fn delete_stale_refresh_tokens(
        &self,
        now: Timestamp,
        revoked_before: Timestamp,
    ) -> StoreResult<u64> {
        Ok(RefreshTokenRepo::delete_stale(&self.pool, now, revoked_before).await?)
    }
}

#[async_trait]
impl BoardStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        Ok(ProjectRepo::create_with_defaults(&self.pool, input).await?)
    }

    async fn upsert_member(
        &self,
        project_id: DbId,
        user_id: DbId,
        role: ProjectRole,
    ) -> StoreResult<()> {
        Ok(ProjectRepo::upsert_member(&self.pool, project_id, user_id, role).await?)
    }

    async fn find_member_role(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> StoreResult<Option<ProjectRole>> {
        let stored = ProjectRepo::find_member_role(&self.pool, project_id, user_id).await?;
        Ok(stored.and_then(|name| match name.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(project_id, user_id, error = %e, "Ignoring unknown stored role");
                None
            }
        }))
    }

    async fn find_list(&self, id: DbId) -> StoreResult<Option<BoardList>> {
        Ok(ListRepo::find_by_id(&self.pool, id).await?)
    }

    async fn lists_for_project(&self, project_id: DbId) -> StoreResult<Vec<BoardList>> {
        Ok(ListRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn find_archive_list(&self, project_id: DbId) -> StoreResult<Option<BoardList>> {
        Ok(ListRepo::find_archive(&self.pool, project_id).await?)
    }

    async fn create_list(&self, input: &CreateList) -> StoreResult<BoardList> {
        Ok(ListRepo::create(&self.pool, input).await?)
    }

    async fn update_list(&self, id: DbId, input: &UpdateList) -> StoreResult<Option<BoardList>> {
        Ok(ListRepo::update(&self.pool, id, input).await?)
    }

    async fn set_flow_control(
        &self,
        id: DbId,
        required_role_to_enter: &[ProjectRole],
        required_role_to_leave: &[ProjectRole],
    ) -> StoreResult<Option<BoardList>> {
        let enter = role_set_names(required_role_to_enter);
        let leave = role_set_names(required_role_to_leave);
        Ok(ListRepo::set_flow_control(&self.pool, id, &enter, &leave).await?)
    }

    async fn delete_list(&self, id: DbId, archive_list_id: DbId) -> StoreResult<u64> {
        Ok(ListRepo::delete_into_archive(&self.pool, id, archive_list_id).await?)
    }

    async fn find_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        Ok(TaskRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_task(&self, input: &CreateTask) -> StoreResult<Task> {
        Ok(TaskRepo::create(&self.pool, input).await?)
    }

    async fn place_task(&self, id: DbId, placement: &TaskPlacement) -> StoreResult<Option<Task>> {
        Ok(TaskRepo::place(&self.pool, id, placement).await?)
    }
}
