use crate::error::{AppError, Result};
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// The size of a bearer token in bytes.
const TOKEN_SIZE: usize = 32;

/// Generates a new random bearer token.
///
/// # Returns
///
/// A URL-safe base64-encoded token.
pub fn generate_token() -> Result<String> {
    let mut token = [0u8; TOKEN_SIZE];
    OsRng
        .try_fill_bytes(&mut token)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(token))
}

/// The key a token is stored under: the hex SHA-256 of the token.
pub fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();

        assert_ne!(a, b);
        // 32 bytes -> 43 base64 characters without padding.
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn fingerprint_is_stable_and_hides_the_token() {
        let token = generate_token().unwrap();

        assert_eq!(fingerprint(&token), fingerprint(&token));
        assert_eq!(fingerprint(&token).len(), 64);
        assert!(!fingerprint(&token).contains(&token));
        assert_ne!(fingerprint("a"), fingerprint("b"));
    }
}
