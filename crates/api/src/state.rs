use std::sync::Arc;

use taskflow_db::BoardStore;

use crate::auth::session::SessionManager;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`. Built once at
/// startup (or per test) with the store adapter of choice.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session manager over the token store.
    pub sessions: Arc<SessionManager>,
    /// Projects, memberships, lists, and tasks.
    pub board: Arc<dyn BoardStore>,
}
