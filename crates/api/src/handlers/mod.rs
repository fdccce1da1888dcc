pub mod auth;
pub mod lists;
pub mod projects;
pub mod tasks;
