//! Refresh-token cookie handling.
//!
//! The refresh token never appears in a JSON body. It travels in an
//! `HttpOnly`, `SameSite=Strict` cookie scoped to the auth routes, marked
//! `Secure` in production.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};

/// Cookie carrying the raw refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// The cookie is only sent to the auth endpoints.
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

/// `Set-Cookie` value holding a freshly issued refresh token.
pub fn refresh_cookie(raw_token: &str, max_age_days: i64, secure: bool) -> String {
    Cookie::build((REFRESH_COOKIE_NAME, raw_token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH)
        .max_age(CookieDuration::days(max_age_days))
        .build()
        .to_string()
}

/// `Set-Cookie` value that makes the browser drop the refresh cookie.
pub fn clear_refresh_cookie(secure: bool) -> String {
    Cookie::build((REFRESH_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH)
        .max_age(CookieDuration::seconds(0))
        .build()
        .to_string()
}

/// Read the refresh token from the request's `Cookie` headers, if present.
pub fn refresh_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|part| Cookie::parse(part.trim().to_string()).ok())
        .find(|cookie| cookie.name() == REFRESH_COOKIE_NAME && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn refresh_cookie_has_security_attributes() {
        let cookie = refresh_cookie("abc123", 7, true);
        assert!(cookie.starts_with("refresh_token=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/api/v1/auth"));
        assert!(cookie.contains(&format!("Max-Age={}", 7 * 24 * 60 * 60)));
    }

    #[test]
    fn secure_flag_follows_config() {
        assert!(!refresh_cookie("abc123", 7, false).contains("Secure"));
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = clear_refresh_cookie(false);
        assert!(cookie.starts_with("refresh_token="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; refresh_token=deadbeef"));
        assert_eq!(refresh_token_from_headers(&headers).as_deref(), Some("deadbeef"));
    }

    #[test]
    fn missing_or_empty_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(refresh_token_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("refresh_token="));
        assert_eq!(refresh_token_from_headers(&headers), None);
    }
}
