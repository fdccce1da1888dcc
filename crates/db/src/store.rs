//! Storage ports consumed by the API layer.
//!
//! The session manager depends only on [`TokenStore`]; board handlers depend
//! only on [`BoardStore`]. Both are object-safe so the server can hold them as
//! `Arc<dyn …>` and swap the Postgres adapter for the in-memory one in tests.

use async_trait::async_trait;
use taskflow_core::roles::ProjectRole;
use taskflow_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::list::{BoardList, CreateList, UpdateList};
use crate::models::project::{CreateProject, Project};
use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};
use crate::models::task::{CreateTask, Task, TaskPlacement};
use crate::models::user::{CreateUser, User};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A Postgres / driver error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store could not be used (e.g. a poisoned lock).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Users and refresh tokens: everything the session manager persists.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::Conflict`] (memory) or a unique
    /// violation (Postgres) when the email is taken.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>>;

    /// Lookup by normalised email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Count a failed login; lock the account until `lock_until` when given.
    async fn record_failed_login(&self, id: DbId, lock_until: Option<Timestamp>) -> StoreResult<()>;

    /// Reset the failure counter and stamp the login time.
    async fn record_successful_login(&self, id: DbId) -> StoreResult<()>;

    async fn insert_refresh_token(&self, input: &CreateRefreshToken) -> StoreResult<RefreshToken>;

    /// Lookup by hash, including revoked and expired rows.
    async fn find_refresh_token(&self, token_hash: &str) -> StoreResult<Option<RefreshToken>>;

    /// Atomically revoke `current_id` and insert `next`.
    ///
    /// Returns `None` without inserting when `current_id` was already revoked,
    /// so exactly one of several concurrent rotations of a token can win.
    async fn rotate_refresh_token(
        &self,
        current_id: DbId,
        next: &CreateRefreshToken,
    ) -> StoreResult<Option<RefreshToken>>;

    /// Revoke one token. `true` if it was live.
    async fn revoke_refresh_token(&self, id: DbId) -> StoreResult<bool>;

    /// Revoke every live token in a family; returns the count.
    async fn revoke_family(&self, family: Uuid) -> StoreResult<u64>;

    /// Revoke every live token of a user; returns the count.
    async fn revoke_all_for_user(&self, user_id: DbId) -> StoreResult<u64>;

    /// Delete tokens expired before `now` or revoked before `revoked_before`.
    async fn delete_stale_refresh_tokens(
        &self,
        now: Timestamp,
        revoked_before: Timestamp,
    ) -> StoreResult<u64>;
}

/// Projects, memberships, lists, and tasks.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Cheap reachability check for `/health`.
    async fn ping(&self) -> StoreResult<()>;

    /// Create a project with its owner membership, default lists, and archive list.
    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project>;

    /// Add a member, or change the role of an existing one.
    async fn upsert_member(&self, project_id: DbId, user_id: DbId, role: ProjectRole)
        -> StoreResult<()>;

    /// The caller's role in a project; `None` if not a member.
    async fn find_member_role(&self, project_id: DbId, user_id: DbId)
        -> StoreResult<Option<ProjectRole>>;

    async fn find_list(&self, id: DbId) -> StoreResult<Option<BoardList>>;

    /// Lists in board order, archive last.
    async fn lists_for_project(&self, project_id: DbId) -> StoreResult<Vec<BoardList>>;

    async fn find_archive_list(&self, project_id: DbId) -> StoreResult<Option<BoardList>>;

    async fn create_list(&self, input: &CreateList) -> StoreResult<BoardList>;

    async fn update_list(&self, id: DbId, input: &UpdateList) -> StoreResult<Option<BoardList>>;

    async fn set_flow_control(
        &self,
        id: DbId,
        required_role_to_enter: &[ProjectRole],
        required_role_to_leave: &[ProjectRole],
    ) -> StoreResult<Option<BoardList>>;

    /// Archive every task of `id` into `archive_list_id` and delete the list.
    async fn delete_list(&self, id: DbId, archive_list_id: DbId) -> StoreResult<u64>;

    async fn find_task(&self, id: DbId) -> StoreResult<Option<Task>>;

    async fn create_task(&self, input: &CreateTask) -> StoreResult<Task>;

    async fn place_task(&self, id: DbId, placement: &TaskPlacement) -> StoreResult<Option<Task>>;
}
