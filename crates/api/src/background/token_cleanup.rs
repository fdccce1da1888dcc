//! Periodic sweep of stale refresh tokens.
//!
//! Deletes tokens that have expired or were revoked longer ago than the
//! retention window. Skipping a run only delays cleanup; token checks never
//! depend on it.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::session::SessionManager;

/// Run the cleanup loop every `interval` until `cancel` is triggered.
///
/// The first sweep runs immediately.
pub async fn run(sessions: Arc<SessionManager>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Token cleanup job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Token cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sessions.cleanup_expired_tokens().await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Token cleanup: purged stale refresh tokens");
                    }
                    Ok(_) => tracing::debug!("Token cleanup: nothing to purge"),
                    Err(e) => tracing::error!(error = %e, "Token cleanup failed"),
                }
            }
        }
    }
}
