//! List flow control: who may move a task out of one list and into another.
//!
//! Each list carries two allow-lists of project roles. An empty list means
//! "unrestricted". The check is plain set membership; the administrative
//! hierarchy in [`ProjectRole::at_least`] is never consulted here.
//!
//! [`decide`] is the pure policy. [`authorize_move`] wraps it with the rules
//! the user-facing move operation layers on top (same-list reorders, the
//! archive list) and turns a denial into a [`CoreError`].

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::ProjectRole;
use crate::types::DbId;

/// The subset of a list that flow control looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFlowRules {
    pub list_id: DbId,
    pub name: String,
    pub is_archive: bool,
    /// Roles allowed to move a task into this list. Empty = anyone.
    pub required_role_to_enter: Vec<ProjectRole>,
    /// Roles allowed to move a task out of this list. Empty = anyone.
    pub required_role_to_leave: Vec<ProjectRole>,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FlowDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// How a permitted user-initiated move should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Same list, new position. Flow control was not consulted.
    Reorder,
    /// Different list; both restriction sets were satisfied.
    Transfer,
}

fn permits(allowed: &[ProjectRole], role: ProjectRole) -> bool {
    allowed.is_empty() || allowed.contains(&role)
}

/// Decide whether `role` may move a task from `source` to `target`.
///
/// Never fails. A move within a single list is always allowed regardless of
/// that list's restrictions. Otherwise the leave-set of `source` is checked
/// first, then the enter-set of `target`.
pub fn decide(source: &ListFlowRules, target: &ListFlowRules, role: ProjectRole) -> FlowDecision {
    if source.list_id == target.list_id {
        return FlowDecision::allow();
    }

    if !permits(&source.required_role_to_leave, role) {
        return FlowDecision::deny(format!("cannot leave list \"{}\"", source.name));
    }

    if !permits(&target.required_role_to_enter, role) {
        return FlowDecision::deny(format!("cannot enter list \"{}\"", target.name));
    }

    FlowDecision::allow()
}

/// Validate a user-initiated move before it is written.
///
/// - Same list: [`MoveKind::Reorder`], restrictions are not consulted. This
///   includes reordering inside the archive list.
/// - Archived tasks must be restored, not moved out.
/// - The archive list is reachable only through the archive operation.
/// - Anything else goes through [`decide`]; a denial becomes
///   [`CoreError::Forbidden`] carrying the decision's reason.
pub fn authorize_move(
    source: &ListFlowRules,
    target: &ListFlowRules,
    role: ProjectRole,
) -> Result<MoveKind, CoreError> {
    if source.list_id == target.list_id {
        return Ok(MoveKind::Reorder);
    }

    if source.is_archive {
        return Err(CoreError::Validation(
            "Archived tasks must be restored before they can be moved".into(),
        ));
    }

    if target.is_archive {
        return Err(CoreError::Validation(
            "Tasks cannot be moved into the archive list; archive the task instead".into(),
        ));
    }

    let decision = decide(source, target, role);
    if !decision.allowed {
        return Err(CoreError::Forbidden(decision.reason.unwrap_or_else(|| {
            "You are not allowed to perform this move".to_string()
        })));
    }

    Ok(MoveKind::Transfer)
}
