use crate::error::{AppError, Result};

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 64 {
        return Err(AppError::Validation(
            "Username must be at most 64 characters".to_string(),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }

    if password.chars().count() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_the-builder42").is_ok());
    }

    #[test]
    fn rejects_short_long_and_odd_usernames() {
        assert!(matches!(validate_username("al"), Err(AppError::Validation(_))));
        assert!(matches!(
            validate_username(&"a".repeat(65)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(validate_username("alice smith"), Err(AppError::Validation(_))));
        assert!(matches!(validate_username("äöü"), Err(AppError::Validation(_))));
    }

    #[test]
    fn short_passwords_are_allowed_but_blank_ones_are_not() {
        assert!(validate_password("pw1").is_ok());
        assert!(validate_password("   ").is_err());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn password_limit_counts_characters_not_bytes() {
        assert!(validate_password(&"é".repeat(100)).is_ok());
        assert!(validate_password(&"密".repeat(128)).is_ok());
        assert!(validate_password(&"é".repeat(129)).is_err());
    }
}
