//! Password services: plaintext (storage-layout compatible) and Argon2.

use quill_core::AuthError;
use quill_core::ports::PasswordService;

/// Stores passwords as given and compares them exactly.
///
/// Keeps `blog_users` readable by clients that expect plaintext entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswordService;

impl PasswordService for PlaintextPasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        Ok(password == stored)
    }
}

#[cfg(feature = "hashing")]
pub use argon::Argon2PasswordService;

#[cfg(feature = "hashing")]
mod argon {
    use argon2::{
        Argon2,
        password_hash::{
            PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
        },
    };

    use quill_core::AuthError;
    use quill_core::ports::PasswordService;

    /// Argon2-based password service.
    pub struct Argon2PasswordService {
        argon2: Argon2<'static>,
    }

    impl Argon2PasswordService {
        pub fn new() -> Self {
            Self {
                argon2: Argon2::default(),
            }
        }
    }

    impl Default for Argon2PasswordService {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PasswordService for Argon2PasswordService {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            let salt = SaltString::generate(&mut OsRng);

            self.argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AuthError::Hashing(e.to_string()))
        }

        fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
            // Accounts written before hashing was enabled hold plaintext.
            let Ok(parsed_hash) = PasswordHash::new(stored) else {
                tracing::warn!("Stored password is not a PHC hash; rejecting");
                return Ok(false);
            };

            Ok(self
                .argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        }
    }

}
