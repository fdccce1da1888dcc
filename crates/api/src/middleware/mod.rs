//! Authentication and authorization helpers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`project_access::require_project_role`] -- Membership and minimum project role.

pub mod auth;
pub mod project_access;
