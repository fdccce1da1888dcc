//! Registration input rules: email normalisation, display name, password strength.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Minimum display name length in characters.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Canonical form used for storage and lookup: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate that a password meets the strength requirements.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters including an
/// upper-case letter, a lower-case letter, a digit, and a symbol. Returns the
/// first failed rule as a human-readable message.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain an upper-case letter".into());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain a lower-case letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit".into());
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Err("Password must contain a special character".into());
    }
    Ok(())
}

/// Validate a registration request. `email` is expected to be normalised.
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), CoreError> {
    if name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at least {MIN_NAME_LENGTH} characters long"
        )));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation("A valid email address is required".into()));
    }
    validate_password_strength(password).map_err(CoreError::Validation)
}
