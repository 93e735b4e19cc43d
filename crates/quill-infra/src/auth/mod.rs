//! Credential store and password services.

mod credentials;
mod password;

pub use credentials::{AuthConfig, CredentialStore};
pub use password::PlaintextPasswordService;

#[cfg(feature = "hashing")]
pub use password::Argon2PasswordService;

/// Mask an email for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}
