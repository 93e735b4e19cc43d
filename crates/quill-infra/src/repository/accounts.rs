//! Account repository over the `blog_users` entry.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::RepoError;
use quill_core::domain::Account;
use quill_core::ports::{AccountRepository, KeyValueStore, keys};

/// Account repository backed by a key-value store.
///
/// Reads go to storage every time; there is no in-memory mirror. Until the
/// first registration writes `blog_users`, the seed accounts are served.
pub struct StoredAccountRepository {
    store: Arc<dyn KeyValueStore>,
    seed: Vec<Account>,
    write_lock: Mutex<()>,
}

impl StoredAccountRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, seed: Vec<Account>) -> Self {
        Self {
            store,
            seed,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Account>, RepoError> {
        match self.store.get(keys::ACCOUNTS).await? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| RepoError::Serialization(e.to_string()))
            }
            None => Ok(self.seed.clone()),
        }
    }
}

#[async_trait]
impl AccountRepository for StoredAccountRepository {
    async fn list(&self) -> Result<Vec<Account>, RepoError> {
        self.read_all().await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        Ok(self.read_all().await?.into_iter().find(|a| a.email == email))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, RepoError> {
        Ok(self.read_all().await?.into_iter().find(|a| a.id == id))
    }

    async fn insert(&self, account: Account) -> Result<Account, RepoError> {
        let _guard = self.write_lock.lock().await;

        let mut accounts = self.read_all().await?;
        accounts.push(account.clone());

        let json = serde_json::to_string(&accounts)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;
        self.store.set(keys::ACCOUNTS, &json).await?;

        tracing::debug!(account_id = %account.id, total = accounts.len(), "Stored account");
        Ok(account)
    }
}
