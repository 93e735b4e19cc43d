use async_trait::async_trait;

use crate::domain::{Account, NewPost, Post, PostPatch, PostQuery};
use crate::error::RepoError;

/// Post repository - the full surface the view layer may call.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Populate the collection from storage, falling back to seed data.
    /// Never leaves the repository in the loading state.
    async fn load(&self);

    /// True until the first `load` completes. Mutations fail with
    /// [`RepoError::NotLoaded`] meanwhile.
    fn is_loading(&self) -> bool;

    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by its identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError>;

    /// Posts written by an author, in collection order.
    async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts with exactly this category (case-sensitive).
    async fn find_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts matching a category/text query.
    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Create a post, assigning its id and creation date.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Merge a patch into an existing post. `None` if the id is unknown.
    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    /// Remove a post. `false` if the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, RepoError>;
}

/// Account repository. Accounts are append-only.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All stored accounts in registration order.
    async fn list(&self) -> Result<Vec<Account>, RepoError>;

    /// Find an account by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, RepoError>;

    /// Append an account. The caller checks email uniqueness.
    async fn insert(&self, account: Account) -> Result<Account, RepoError>;
}
