//! Domain types shared by every TaskFlow crate.
//!
//! - [`error`] -- the domain error taxonomy.
//! - [`roles`] -- project roles and their administrative hierarchy.
//! - [`flow_control`] -- the list-transition policy for task moves.
//! - [`credentials`] -- registration input rules (email, name, password).

pub mod credentials;
pub mod error;
pub mod flow_control;
pub mod roles;
pub mod types;
