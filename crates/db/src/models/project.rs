//! Project model and the default board layout.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// Lists created together with every project, in board order.
///
/// `(name, color, is_archive)`. The archive list always sits last.
pub const DEFAULT_LISTS: [(&str, &str, bool); 4] = [
    ("To Do", "#6B7280", false),
    ("In Progress", "#3B82F6", false),
    ("Done", "#10B981", false),
    ("Archive", "#9CA3AF", true),
];

/// Position given to the archive list so ordinary lists always sort first.
pub const ARCHIVE_POSITION: i32 = 999;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project. `owner_id` becomes its `OWNER` member.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub owner_id: DbId,
}
