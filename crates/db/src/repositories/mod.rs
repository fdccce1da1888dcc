//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod list_repo;
pub mod project_repo;
pub mod refresh_token_repo;
pub mod task_repo;
pub mod user_repo;

pub use list_repo::ListRepo;
pub use project_repo::ProjectRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
