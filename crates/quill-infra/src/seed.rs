//! Seed data - the initial dataset adopted when storage holds nothing yet.

use std::path::Path;

use quill_core::domain::{Account, Post};
use quill_core::{RepoError, StorageError};

const BUNDLED_POSTS: &str = include_str!("../fixtures/posts.json");
const BUNDLED_ACCOUNTS: &str = include_str!("../fixtures/accounts.json");

/// Immutable initial posts and accounts.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub posts: Vec<Post>,
    pub accounts: Vec<Account>,
}

impl SeedData {
    /// No posts, no accounts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fixtures compiled into the crate.
    pub fn bundled() -> Result<Self, RepoError> {
        Self::parse(BUNDLED_POSTS, BUNDLED_ACCOUNTS)
    }

    /// Read `posts.json` and `accounts.json` from a directory.
    pub async fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RepoError> {
        let dir = dir.as_ref();
        let posts = tokio::fs::read_to_string(dir.join("posts.json"))
            .await
            .map_err(|e| StorageError::Io(format!("posts.json: {e}")))?;
        let accounts = tokio::fs::read_to_string(dir.join("accounts.json"))
            .await
            .map_err(|e| StorageError::Io(format!("accounts.json: {e}")))?;

        let seed = Self::parse(&posts, &accounts)?;
        tracing::info!(
            path = %dir.display(),
            posts = seed.posts.len(),
            accounts = seed.accounts.len(),
            "Loaded seed data"
        );
        Ok(seed)
    }

    fn parse(posts: &str, accounts: &str) -> Result<Self, RepoError> {
        Ok(Self {
            posts: serde_json::from_str(posts)
                .map_err(|e| RepoError::Serialization(format!("seed posts: {e}")))?,
            accounts: serde_json::from_str(accounts)
                .map_err(|e| RepoError::Serialization(format!("seed accounts: {e}")))?,
        })
    }
}
