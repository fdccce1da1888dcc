//! Row models and DTOs, one module per table.

pub mod list;
pub mod project;
pub mod refresh_token;
pub mod task;
pub mod user;
