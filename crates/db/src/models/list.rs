//! Board list model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::flow_control::ListFlowRules;
use taskflow_core::roles::{parse_role_set, UnknownRole};
use taskflow_core::types::{DbId, Timestamp};

/// A row from the `lists` table.
///
/// Role sets are stored as `TEXT[]` of role names; see [`BoardList::flow_rules`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardList {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
    pub is_archive: bool,
    pub required_role_to_enter: Vec<String>,
    pub required_role_to_leave: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BoardList {
    /// The flow-control view of this list.
    ///
    /// Fails if either stored role set holds a name that is not a
    /// [`ProjectRole`](taskflow_core::roles::ProjectRole).
    pub fn flow_rules(&self) -> Result<ListFlowRules, UnknownRole> {
        Ok(ListFlowRules {
            list_id: self.id,
            name: self.name.clone(),
            is_archive: self.is_archive,
            required_role_to_enter: parse_role_set(&self.required_role_to_enter)?,
            required_role_to_leave: parse_role_set(&self.required_role_to_leave)?,
        })
    }
}

/// DTO for creating an ordinary (non-archive) list.
#[derive(Debug, Clone)]
pub struct CreateList {
    pub project_id: DbId,
    pub name: String,
    pub color: Option<String>,
}

/// DTO for renaming / recolouring a list. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateList {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use taskflow_core::roles::ProjectRole;

    use super::*;

    fn list(enter: &[&str], leave: &[&str]) -> BoardList {
        BoardList {
            id: 7,
            project_id: 1,
            name: "Done".into(),
            color: None,
            position: 2,
            is_archive: false,
            required_role_to_enter: enter.iter().map(|s| s.to_string()).collect(),
            required_role_to_leave: leave.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn flow_rules_parses_stored_role_names() {
        let rules = list(&["ADMIN", "OWNER"], &[]).flow_rules().unwrap();
        assert_eq!(rules.list_id, 7);
        assert_eq!(rules.required_role_to_enter, vec![ProjectRole::Admin, ProjectRole::Owner]);
        assert!(rules.required_role_to_leave.is_empty());
    }

    /// A restricted list must never degrade into an open one.
    #[test]
    fn flow_rules_fails_on_unknown_stored_role() {
        assert_matches!(
            list(&["VIEWER"], &[]).flow_rules(),
            Err(UnknownRole(name)) if name == "VIEWER"
        );
        assert_matches!(list(&[], &["ADMIN", "GUEST"]).flow_rules(), Err(_));
    }
}
