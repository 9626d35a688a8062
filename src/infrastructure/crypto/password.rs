//! Password hashing utilities

use bcrypt::{hash, verify};

use crate::shared::InfraError;

/// Hash a password using bcrypt at the given cost (4..=31)
pub fn hash_password(password: &str, cost: u32) -> Result<String, InfraError> {
    hash(password, cost).map_err(|e| InfraError::Crypto(e.to_string()))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, InfraError> {
    verify(password, hash).map_err(|e| InfraError::Crypto(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hashed = hash_password("correct horse", 4).unwrap();
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("battery staple", &hashed).unwrap());
    }

    #[test]
    fn invalid_cost_is_a_crypto_error() {
        assert!(matches!(hash_password("pw", 2), Err(InfraError::Crypto(_))));
    }
}
