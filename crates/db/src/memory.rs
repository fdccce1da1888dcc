//! In-memory store for tests and local demos.
//!
//! Every operation runs under a single write (or read) lock, which gives the
//! same atomicity the Postgres adapter gets from transactions: a rotation
//! checks and revokes the current token in one critical section.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use taskflow_core::roles::{role_set_names, ProjectRole};
use taskflow_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::list::{BoardList, CreateList, UpdateList};
use crate::models::project::{CreateProject, Project, ARCHIVE_POSITION, DEFAULT_LISTS};
use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};
use crate::models::task::{CreateTask, Task, TaskPlacement};
use crate::models::user::{CreateUser, User};
use crate::store::{BoardStore, StoreError, StoreResult, TokenStore};

/// Store holding every table in process memory. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: DbId,
    users: HashMap<DbId, User>,
    refresh_tokens: HashMap<DbId, RefreshToken>,
    projects: HashMap<DbId, Project>,
    members: HashMap<(DbId, DbId), ProjectRole>,
    lists: HashMap<DbId, BoardList>,
    tasks: HashMap<DbId, Task>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn next_task_position(&self, list_id: DbId, excluding: Option<DbId>) -> i32 {
        self.tasks
            .values()
            .filter(|t| t.list_id == list_id && Some(t.id) != excluding)
            .map(|t| t.position)
            .max()
            .map_or(0, |p| p + 1)
    }

    fn insert_list(
        &mut self,
        project_id: DbId,
        name: &str,
        color: Option<String>,
        position: i32,
        is_archive: bool,
    ) -> BoardList {
        let now = Utc::now();
        let list = BoardList {
            id: self.allocate_id(),
            project_id,
            name: name.to_string(),
            color,
            position,
            is_archive,
            required_role_to_enter: Vec::new(),
            required_role_to_leave: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.lists.insert(list.id, list.clone());
        list
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// All refresh tokens in a family, oldest first. Test inspection helper.
    pub fn family_tokens(&self, family: Uuid) -> StoreResult<Vec<RefreshToken>> {
        let state = self.read()?;
        let mut tokens: Vec<RefreshToken> = state
            .refresh_tokens
            .values()
            .filter(|t| t.family == family)
            .cloned()
            .collect();
        tokens.sort_by_key(|t| t.id);
        Ok(tokens)
    }

    /// Total number of stored refresh tokens. Test inspection helper.
    pub fn refresh_token_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.refresh_tokens.len())
    }

    /// Store raw role names on a list, bypassing validation. Test helper for
    /// rows written by an older or newer schema.
    pub fn overwrite_role_names(&self, list_id: DbId, enter: &[&str], leave: &[&str]) -> StoreResult<()> {
        let mut state = self.write()?;
        if let Some(list) = state.lists.get_mut(&list_id) {
            list.required_role_to_enter = enter.iter().map(|s| s.to_string()).collect();
            list.required_role_to_leave = leave.iter().map(|s| s.to_string()).collect();
        }
        Ok(())
    }

    /// Overwrite the revocation stamp of a token. Test helper for retention sweeps.
    pub fn backdate_revocation(&self, id: DbId, revoked_at: Timestamp) -> StoreResult<()> {
        let mut state = self.write()?;
        if let Some(token) = state.refresh_tokens.get_mut(&id) {
            token.revoked_at = Some(revoked_at);
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                input.email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: state.allocate_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            failed_login_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn record_failed_login(&self, id: DbId, lock_until: Option<Timestamp>) -> StoreResult<()> {
        let mut state = self.write()?;
        if let Some(user) = state.users.get_mut(&id) {
            user.failed_login_count += 1;
            if lock_until.is_some() {
                user.locked_until = lock_until;
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn record_successful_login(&self, id: DbId) -> StoreResult<()> {
        let mut state = self.write()?;
        if let Some(user) = state.users.get_mut(&id) {
            let now = Utc::now();
            user.failed_login_count = 0;
            user.locked_until = None;
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn insert_refresh_token(&self, input: &CreateRefreshToken) -> StoreResult<RefreshToken> {
        let mut state = self.write()?;
        if state
            .refresh_tokens
            .values()
            .any(|t| t.token_hash == input.token_hash)
        {
            return Err(StoreError::Conflict("duplicate refresh token hash".into()));
        }
        let token = RefreshToken {
            id: state.allocate_id(),
            user_id: input.user_id,
            token_hash: input.token_hash.clone(),
            family: input.family,
            expires_at: input.expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };
        state.refresh_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_refresh_token(&self, token_hash: &str) -> StoreResult<Option<RefreshToken>> {
        Ok(self
            .read()?
            .refresh_tokens
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn rotate_refresh_token(
        &self,
        current_id: DbId,
        next: &CreateRefreshToken,
    ) -> StoreResult<Option<RefreshToken>> {
        let mut state = self.write()?;
        let now = Utc::now();

        match state.refresh_tokens.get_mut(&current_id) {
            Some(current) if current.revoked_at.is_none() => current.revoked_at = Some(now),
            _ => return Ok(None),
        }

        let token = RefreshToken {
            id: state.allocate_id(),
            user_id: next.user_id,
            token_hash: next.token_hash.clone(),
            family: next.family,
            expires_at: next.expires_at,
            revoked_at: None,
            created_at: now,
        };
        state.refresh_tokens.insert(token.id, token.clone());
        Ok(Some(token))
    }

    async fn revoke_refresh_token(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.write()?;
        match state.refresh_tokens.get_mut(&id) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_family(&self, family: Uuid) -> StoreResult<u64> {
        let mut state = self.write()?;
        let now = Utc::now();
        let mut revoked = 0;
        for token in state
            .refresh_tokens
            .values_mut()
            .filter(|t| t.family == family && t.revoked_at.is_none())
        {
            token.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn revoke_all_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        let mut state = self.write()?;
        let now = Utc::now();
        let mut revoked = 0;
        for token in state
            .refresh_tokens
            .values_mut()
            .filter(|t| t.user_id == user_id && t.revoked_at.is_none())
        {
            token.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn delete_stale_refresh_tokens(
        &self,
        now: Timestamp,
        revoked_before: Timestamp,
    ) -> StoreResult<u64> {
        let mut state = self.write()?;
        let before = state.refresh_tokens.len();
        state.refresh_tokens.retain(|_, t| {
            let expired = t.expires_at < now;
            let long_revoked = t.revoked_at.is_some_and(|at| at < revoked_before);
            !(expired || long_revoked)
        });
        Ok((before - state.refresh_tokens.len()) as u64)
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        let mut state = self.write()?;
        let now = Utc::now();
        let project = Project {
            id: state.allocate_id(),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(project.id, project.clone());
        state
            .members
            .insert((project.id, input.owner_id), ProjectRole::Owner);

        for (index, (name, color, is_archive)) in DEFAULT_LISTS.iter().enumerate() {
            let position = if *is_archive {
                ARCHIVE_POSITION
            } else {
                index as i32
            };
            state.insert_list(project.id, name, Some(color.to_string()), position, *is_archive);
        }
        Ok(project)
    }

    async fn upsert_member(
        &self,
        project_id: DbId,
        user_id: DbId,
        role: ProjectRole,
    ) -> StoreResult<()> {
        self.write()?.members.insert((project_id, user_id), role);
        Ok(())
    }

    async fn find_member_role(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> StoreResult<Option<ProjectRole>> {
        Ok(self.read()?.members.get(&(project_id, user_id)).copied())
    }

    async fn find_list(&self, id: DbId) -> StoreResult<Option<BoardList>> {
        Ok(self.read()?.lists.get(&id).cloned())
    }

    async fn lists_for_project(&self, project_id: DbId) -> StoreResult<Vec<BoardList>> {
        let state = self.read()?;
        let mut lists: Vec<BoardList> = state
            .lists
            .values()
            .filter(|l| l.project_id == project_id)
            .cloned()
            .collect();
        lists.sort_by_key(|l| (l.position, l.id));
        Ok(lists)
    }

    async fn find_archive_list(&self, project_id: DbId) -> StoreResult<Option<BoardList>> {
        Ok(self
            .read()?
            .lists
            .values()
            .find(|l| l.project_id == project_id && l.is_archive)
            .cloned())
    }

    async fn create_list(&self, input: &CreateList) -> StoreResult<BoardList> {
        let mut state = self.write()?;
        let position = state
            .lists
            .values()
            .filter(|l| l.project_id == input.project_id && !l.is_archive)
            .map(|l| l.position)
            .max()
            .map_or(0, |p| p + 1);
        Ok(state.insert_list(
            input.project_id,
            &input.name,
            input.color.clone(),
            position,
            false,
        ))
    }

    async fn update_list(&self, id: DbId, input: &UpdateList) -> StoreResult<Option<BoardList>> {
        let mut state = self.write()?;
        Ok(state.lists.get_mut(&id).map(|list| {
            if let Some(name) = &input.name {
                list.name = name.clone();
            }
            if let Some(color) = &input.color {
                list.color = Some(color.clone());
            }
            list.updated_at = Utc::now();
            list.clone()
        }))
    }

    async fn set_flow_control(
        &self,
        id: DbId,
        required_role_to_enter: &[ProjectRole],
        required_role_to_leave: &[ProjectRole],
    ) -> StoreResult<Option<BoardList>> {
        let mut state = self.write()?;
        Ok(state.lists.get_mut(&id).map(|list| {
            list.required_role_to_enter = role_set_names(required_role_to_enter);
            list.required_role_to_leave = role_set_names(required_role_to_leave);
            list.updated_at = Utc::now();
            list.clone()
        }))
    }

    async fn delete_list(&self, id: DbId, archive_list_id: DbId) -> StoreResult<u64> {
        let mut state = self.write()?;
        if state.lists.get(&id).is_none_or(|l| l.is_archive) {
            return Ok(0);
        }
        let now = Utc::now();
        let mut moved = 0;
        for task in state.tasks.values_mut().filter(|t| t.list_id == id) {
            task.list_id = archive_list_id;
            task.archived_at = Some(now);
            task.updated_at = now;
            moved += 1;
        }
        state.lists.remove(&id);
        Ok(moved)
    }

    async fn find_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn create_task(&self, input: &CreateTask) -> StoreResult<Task> {
        let mut state = self.write()?;
        let now = Utc::now();
        let task = Task {
            id: state.allocate_id(),
            project_id: input.project_id,
            list_id: input.list_id,
            title: input.title.clone(),
            description: input.description.clone(),
            position: state.next_task_position(input.list_id, None),
            archived_at: None,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn place_task(&self, id: DbId, placement: &TaskPlacement) -> StoreResult<Option<Task>> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&id) {
            return Ok(None);
        }
        let position = placement
            .position
            .unwrap_or_else(|| state.next_task_position(placement.list_id, Some(id)));
        Ok(state.tasks.get_mut(&id).map(|task| {
            task.list_id = placement.list_id;
            task.position = position;
            task.archived_at = placement.archived_at;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }
}
