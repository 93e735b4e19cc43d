//! Credential ports.

use crate::error::AuthError;

/// Password storage service.
pub trait PasswordService: Send + Sync {
    /// Produce the stored form of a password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against its stored form.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError>;
}
