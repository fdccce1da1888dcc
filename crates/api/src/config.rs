use crate::auth::jwt::JwtConfig;
use crate::auth::session::DEFAULT_REVOKED_RETENTION_DAYS;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background jobs get to stop after shutdown begins (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Mark the refresh cookie `Secure`. True when `APP_ENV=production`.
    pub cookie_secure: bool,
    /// Interval of the refresh-token sweep in seconds (default: `3600`).
    pub token_cleanup_interval_secs: u64,
    /// Days a revoked refresh token is kept before the sweep deletes it (default: `30`).
    pub revoked_token_retention_days: i64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                    |
    /// |--------------------------------|----------------------------|
    /// | `HOST`                         | `0.0.0.0`                  |
    /// | `PORT`                         | `3000`                     |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`        | `30`                       |
    /// | `APP_ENV`                      | `development`              |
    /// | `TOKEN_CLEANUP_INTERVAL_SECS`  | `3600`                     |
    /// | `REVOKED_TOKEN_RETENTION_DAYS` | `30`                       |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let cookie_secure = std::env::var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let token_cleanup_interval_secs: u64 = std::env::var("TOKEN_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("TOKEN_CLEANUP_INTERVAL_SECS must be a valid u64");

        let revoked_token_retention_days: i64 = std::env::var("REVOKED_TOKEN_RETENTION_DAYS")
            .unwrap_or_else(|_| DEFAULT_REVOKED_RETENTION_DAYS.to_string())
            .parse()
            .expect("REVOKED_TOKEN_RETENTION_DAYS must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            cookie_secure,
            token_cleanup_interval_secs,
            revoked_token_retention_days,
            jwt,
        }
    }
}
