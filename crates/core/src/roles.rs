//! Project role names and the administrative role hierarchy.
//!
//! The string forms must match the `role` check constraint on
//! `project_members` in `20260301000003_create_project_members.sql`.
//!
//! Two independent mechanisms consume [`ProjectRole`]:
//!
//! - Administrative checks (e.g. "ADMIN or above may delete a list") use the
//!   ordered hierarchy exposed by [`ProjectRole::at_least`].
//! - List flow control uses explicit allow-lists and plain set membership
//!   (see [`crate::flow_control`]). An `OWNER` is *not* implicitly allowed
//!   through a list that only names `ADMIN`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_OWNER: &str = "OWNER";
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MEMBER: &str = "MEMBER";

/// A user's role inside a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectRole {
    Owner,
    Admin,
    Member,
}

impl ProjectRole {
    /// Every role, highest privilege first.
    pub const ALL: [ProjectRole; 3] = [ProjectRole::Owner, ProjectRole::Admin, ProjectRole::Member];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectRole::Owner => ROLE_OWNER,
            ProjectRole::Admin => ROLE_ADMIN,
            ProjectRole::Member => ROLE_MEMBER,
        }
    }

    fn rank(self) -> u8 {
        match self {
            ProjectRole::Owner => 3,
            ProjectRole::Admin => 2,
            ProjectRole::Member => 1,
        }
    }

    /// Hierarchy check for administrative permissions: `OWNER > ADMIN > MEMBER`.
    pub fn at_least(self, min: ProjectRole) -> bool {
        self.rank() >= min.rank()
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or submitted role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for ProjectRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_OWNER => Ok(ProjectRole::Owner),
            ROLE_ADMIN => Ok(ProjectRole::Admin),
            ROLE_MEMBER => Ok(ProjectRole::Member),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Parse stored role names. Any unrecognised name fails the whole set.
///
/// Dropping the name instead could empty a restricted allow-list, and an
/// empty allow-list means "anyone".
pub fn parse_role_set<S: AsRef<str>>(names: &[S]) -> Result<Vec<ProjectRole>, UnknownRole> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

/// Render a role set as stored names, removing duplicates while keeping order.
pub fn role_set_names(roles: &[ProjectRole]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(roles.len());
    for role in roles {
        let name = role.as_str().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
