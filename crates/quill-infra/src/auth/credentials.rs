//! Credential store: registration, login and the current session.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use quill_core::AuthError;
use quill_core::domain::{Account, Session};
use quill_core::ports::{AccountRepository, IdGenerator, KeyValueStore, PasswordService, keys};

use super::mask_email;
use crate::id::next_unused;

/// Credential store configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Drop a restored session whose account no longer exists.
    pub verify_restored_session: bool,
}

impl AuthConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            verify_restored_session: std::env::var("VERIFY_RESTORED_SESSION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Owns the account collection and the single current session.
///
/// Failed registrations and logins come back as `Ok(None)`; only storage
/// and serialization problems are errors.
pub struct CredentialStore {
    accounts: Arc<dyn AccountRepository>,
    store: Arc<dyn KeyValueStore>,
    passwords: Arc<dyn PasswordService>,
    ids: Arc<dyn IdGenerator>,
    session: RwLock<Option<Session>>,
    registration: Mutex<()>,
    config: AuthConfig,
}

impl CredentialStore {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        store: Arc<dyn KeyValueStore>,
        passwords: Arc<dyn PasswordService>,
        ids: Arc<dyn IdGenerator>,
        config: AuthConfig,
    ) -> Self {
        Self {
            accounts,
            store,
            passwords,
            ids,
            session: RwLock::new(None),
            registration: Mutex::new(()),
            config,
        }
    }

    /// Register a new account and sign it in.
    ///
    /// `None` when the email is already taken (exact, case-sensitive match).
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, AuthError> {
        let _guard = self.registration.lock().await;

        let existing = self.accounts.list().await?;
        if existing.iter().any(|a| a.email == email) {
            tracing::info!(email = %mask_email(email), "Registration rejected: email taken");
            return Ok(None);
        }

        let id = next_unused(self.ids.as_ref(), existing.iter().map(|a| a.id.as_str()));
        let stored_password = self.passwords.hash(password)?;
        let account = Account::new(id, name.to_string(), email.to_string(), stored_password);

        let account = self.accounts.insert(account).await?;
        let session = account.session();
        self.set_session(session.clone()).await?;

        tracing::info!(account_id = %session.id, "Registered account");
        Ok(Some(session))
    }

    /// Sign in with an email and password.
    ///
    /// `None` covers both unknown email and wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError> {
        let accounts = self.accounts.list().await?;

        let mut found = None;
        for account in accounts.iter().filter(|a| a.email == email) {
            if self.passwords.verify(password, &account.password)? {
                found = Some(account);
                break;
            }
        }

        let Some(account) = found else {
            tracing::info!(email = %mask_email(email), "Login failed");
            return Ok(None);
        };

        let session = account.session();
        self.set_session(session.clone()).await?;

        tracing::info!(account_id = %session.id, "Logged in");
        Ok(Some(session))
    }

    /// Clear the session in storage, then in memory.
    ///
    /// If the stored record cannot be removed the session stays current, so
    /// memory never claims a logout that a restart would undo.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let mut current = self.session.write().await;
        self.store.remove(keys::SESSION).await?;

        if let Some(session) = current.take() {
            tracing::info!(account_id = %session.id, "Logged out");
        }
        Ok(())
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Adopt the persisted session, if any.
    ///
    /// A record that fails to parse is removed. The session is checked
    /// against the account collection only when
    /// [`AuthConfig::verify_restored_session`] is set.
    pub async fn restore(&self) -> Result<Option<Session>, AuthError> {
        let Some(json) = self.store.get(keys::SESSION).await? else {
            return Ok(None);
        };

        let session: Session = match serde_json::from_str(&json) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session record");
                self.store.remove(keys::SESSION).await?;
                return Ok(None);
            }
        };

        if self.config.verify_restored_session
            && self.accounts.find_by_id(&session.id).await?.is_none()
        {
            tracing::warn!(account_id = %session.id, "Restored session has no account; discarding");
            self.store.remove(keys::SESSION).await?;
            return Ok(None);
        }

        *self.session.write().await = Some(session.clone());
        tracing::info!(account_id = %session.id, "Restored session");
        Ok(Some(session))
    }

    /// Public profile of an account (no password).
    pub async fn find_account(&self, id: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.accounts.find_by_id(id).await?.map(|a| a.session()))
    }

    /// Persist first, then adopt, so a failed write leaves no half state.
    async fn set_session(&self, session: Session) -> Result<(), AuthError> {
        let json =
            serde_json::to_string(&session).map_err(|e| AuthError::Serialization(e.to_string()))?;
        let mut current = self.session.write().await;
        self.store.set(keys::SESSION, &json).await?;
        *current = Some(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::StorageError;

    use crate::auth::PlaintextPasswordService;
    use crate::id::UuidIdGenerator;
    use crate::repository::StoredAccountRepository;
    use crate::storage::InMemoryKvStore;

    fn credential_store(store: Arc<InMemoryKvStore>, config: AuthConfig) -> CredentialStore {
        let accounts = Arc::new(StoredAccountRepository::new(store.clone(), Vec::new()));
        CredentialStore::new(
            accounts,
            store,
            Arc::new(PlaintextPasswordService),
            Arc::new(UuidIdGenerator),
            config,
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store, AuthConfig::default());

        assert!(auth.register("Ann", "ann@x.com", "pw").await.unwrap().is_some());

        let session = auth.login("ann@x.com", "pw").await.unwrap().unwrap();
        assert_eq!(session.name, "Ann");

        assert!(auth.login("ann@x.com", "wrong").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_accounts_unchanged() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store.clone(), AuthConfig::default());
        auth.register("Ann", "ann@x.com", "pw").await.unwrap();
        let before = store.get(keys::ACCOUNTS).await.unwrap();

        let second = auth.register("Other", "ann@x.com", "different").await.unwrap();

        assert!(second.is_none());
        assert_eq!(store.get(keys::ACCOUNTS).await.unwrap(), before);
        assert_eq!(auth.current_session().await.unwrap().name, "Ann");
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store, AuthConfig::default());
        auth.register("Ann", "ann@x.com", "pw").await.unwrap();

        assert!(auth.register("Ann", "Ann@x.com", "pw").await.unwrap().is_some());
        assert!(auth.login("ANN@x.com", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_persists_session_without_password() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store.clone(), AuthConfig::default());

        auth.register("Ann", "ann@x.com", "secret").await.unwrap();

        let record = store.get(keys::SESSION).await.unwrap().unwrap();
        assert!(record.contains("ann@x.com"));
        assert!(!record.contains("secret"));
        assert!(auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_record() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store.clone(), AuthConfig::default());
        auth.register("Ann", "ann@x.com", "pw").await.unwrap();

        auth.logout().await.unwrap();

        assert!(auth.current_session().await.is_none());
        assert!(!auth.is_authenticated().await);
        assert!(!store.contains(keys::SESSION).await.unwrap());
    }

    /// Store whose removals always fail.
    struct StuckStore(InMemoryKvStore);

    #[async_trait::async_trait]
    impl KeyValueStore for StuckStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value).await
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("read-only medium".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_session_consistent_with_storage() {
        let store: Arc<dyn KeyValueStore> = Arc::new(StuckStore(InMemoryKvStore::new()));
        let accounts = Arc::new(StoredAccountRepository::new(store.clone(), Vec::new()));
        let auth = CredentialStore::new(
            accounts,
            store.clone(),
            Arc::new(PlaintextPasswordService),
            Arc::new(UuidIdGenerator),
            AuthConfig::default(),
        );
        auth.register("Ann", "ann@x.com", "pw").await.unwrap();

        assert!(auth.logout().await.is_err());
        assert_eq!(auth.current_session().await.unwrap().email, "ann@x.com");
        assert!(store.contains(keys::SESSION).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store, AuthConfig::default());
        auth.register("Ann", "ann@x.com", "pw").await.unwrap();

        assert!(auth.login("nobody@x.com", "pw").await.unwrap().is_none());
        assert_eq!(auth.current_session().await.unwrap().email, "ann@x.com");
    }

    #[tokio::test]
    async fn test_restore_adopts_persisted_session() {
        let store = Arc::new(InMemoryKvStore::new());
        let first = credential_store(store.clone(), AuthConfig::default());
        let registered = first.register("Ann", "ann@x.com", "pw").await.unwrap().unwrap();

        let second = credential_store(store, AuthConfig::default());
        assert!(second.current_session().await.is_none());

        let restored = second.restore().await.unwrap();
        assert_eq!(restored, Some(registered));
        assert!(second.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_restore_without_verification_keeps_ghost_session() {
        let store = Arc::new(InMemoryKvStore::new());
        let ghost = Account::new(
            "gone".to_string(),
            "Ghost".to_string(),
            "ghost@x.com".to_string(),
            "pw".to_string(),
        )
        .session();
        store
            .set(keys::SESSION, &serde_json::to_string(&ghost).unwrap())
            .await
            .unwrap();

        let lenient = credential_store(store.clone(), AuthConfig::default());
        assert_eq!(lenient.restore().await.unwrap(), Some(ghost));

        let strict = credential_store(
            store.clone(),
            AuthConfig {
                verify_restored_session: true,
            },
        );
        assert_eq!(strict.restore().await.unwrap(), None);
        assert!(!store.contains(keys::SESSION).await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_discards_corrupt_record() {
        let store = Arc::new(InMemoryKvStore::new());
        store.set(keys::SESSION, "{broken").await.unwrap();

        let auth = credential_store(store.clone(), AuthConfig::default());
        assert_eq!(auth.restore().await.unwrap(), None);
        assert!(!store.contains(keys::SESSION).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_account_returns_public_profile() {
        let store = Arc::new(InMemoryKvStore::new());
        let auth = credential_store(store, AuthConfig::default());
        let session = auth.register("Ann", "ann@x.com", "pw").await.unwrap().unwrap();

        let profile = auth.find_account(&session.id).await.unwrap().unwrap();
        assert_eq!(profile.name, "Ann");
        assert!(profile.avatar.unwrap().ends_with("seed=Ann"));
        assert!(auth.find_account("missing").await.unwrap().is_none());
    }
}
