//! Salted one-way hashing for user secrets (Argon2id, PHC string format).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Constant-time comparison of `candidate` against a stored PHC hash.
/// A hash that does not parse never verifies.
pub fn verify_password(candidate: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let a = hash_password("secret1").expect("hash");
        let b = hash_password("secret1").expect("hash");

        assert_ne!(a, "secret1");
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
        assert!(!verify_password("wrongpass", &a));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("secret1", "secret1"));
        assert!(!verify_password("", ""));
    }
}
