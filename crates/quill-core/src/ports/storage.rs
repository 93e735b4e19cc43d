use async_trait::async_trait;

use crate::error::StorageError;

/// Keys of the persisted entries.
pub mod keys {
    /// JSON array of posts.
    pub const POSTS: &str = "blogs_data";
    /// JSON array of accounts, passwords included.
    pub const ACCOUNTS: &str = "blog_users";
    /// JSON session object; absent when logged out.
    pub const SESSION: &str = "blog_auth_user";
}

/// Key-value store trait - abstraction over local persistent storage
/// (in-memory, file directory, Redis).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Check if a key exists.
    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}
