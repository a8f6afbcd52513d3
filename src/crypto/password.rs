use crate::config::PasswordHashing;
use crate::error::{AppError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroize;

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
/// * `params` - The Argon2 cost parameters.
///
/// # Returns
///
/// A `Result` containing the PHC-formatted hash.
pub fn hash_password(password: &str, params: &PasswordHashing) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params
            .params()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let result = argon2
        .hash_password(&password_bytes, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)));

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    result
}

/// Verifies a password against a stored hash.
///
/// The cost parameters are read from the hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let matches = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cheap_hashing;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("pw1", &cheap_hashing()).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("pw1"));
        assert!(verify_password("pw1", &hash).unwrap());
        assert!(!verify_password("pw2", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("pw1", &cheap_hashing()).unwrap();
        let b = hash_password("pw1", &cheap_hashing()).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("pw1", "not-a-phc-string"),
            Err(AppError::Internal(_))
        ));
    }
}
