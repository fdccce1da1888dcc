//! Authentication primitives and the session manager.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token signing/validation and refresh-token helpers.
//! - [`cookies`] -- the refresh-token cookie.
//! - [`session`] -- [`session::SessionManager`]: login, rotation, reuse detection, logout.

pub mod cookies;
pub mod jwt;
pub mod password;
pub mod session;
