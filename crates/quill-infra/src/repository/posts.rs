//! Post repository: an in-memory mirror of the `blogs_data` entry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::RepoError;
use quill_core::domain::{NewPost, Post, PostPatch, PostQuery};
use quill_core::ports::{IdGenerator, KeyValueStore, PostRepository, keys};

use crate::id::next_unused;

/// Post repository configuration.
#[derive(Debug, Clone)]
pub struct PostRepositoryConfig {
    /// Artificial latency before the initial load resolves.
    pub load_delay: Duration,
}

impl Default for PostRepositoryConfig {
    fn default() -> Self {
        Self {
            load_delay: Duration::from_millis(500),
        }
    }
}

impl PostRepositoryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            load_delay: Duration::from_millis(
                std::env::var("LOAD_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(500),
            ),
        }
    }
}

/// Post repository backed by a key-value store.
///
/// Every mutation rewrites the whole collection. The mirror only changes
/// once the write has succeeded, so a failed persist leaves state as it was.
pub struct StoredPostRepository {
    store: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    seed: Vec<Post>,
    posts: RwLock<Vec<Post>>,
    loading: AtomicBool,
    config: PostRepositoryConfig,
}

impl StoredPostRepository {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
        seed: Vec<Post>,
        config: PostRepositoryConfig,
    ) -> Self {
        Self {
            store,
            ids,
            seed,
            posts: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
            config,
        }
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), RepoError> {
        let json =
            serde_json::to_string(posts).map_err(|e| RepoError::Serialization(e.to_string()))?;
        self.store.set(keys::POSTS, &json).await?;
        Ok(())
    }

    /// Stored collection, or `None` when nothing has been saved yet.
    async fn read_stored(&self) -> Result<Option<Vec<Post>>, RepoError> {
        match self.store.get(keys::POSTS).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| RepoError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Writing before `load` would replace the stored collection (and the
    /// seed) with a partial one.
    fn ensure_loaded(&self) -> Result<(), RepoError> {
        if self.is_loading() {
            tracing::warn!("Post mutation rejected: collection not loaded");
            return Err(RepoError::NotLoaded);
        }
        Ok(())
    }

    async fn filtered(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let posts = self.posts.read().await;
        posts.iter().filter(|&p| keep(p)).cloned().collect()
    }
}

#[async_trait]
impl PostRepository for StoredPostRepository {
    async fn load(&self) {
        if !self.config.load_delay.is_zero() {
            tokio::time::sleep(self.config.load_delay).await;
        }

        let loaded = match self.read_stored().await {
            Ok(Some(posts)) => {
                tracing::debug!(count = posts.len(), "Loaded stored posts");
                posts
            }
            Ok(None) => {
                let posts = self.seed.clone();
                if let Err(e) = self.persist(&posts).await {
                    tracing::error!(error = %e, "Failed to persist seed posts");
                }
                tracing::info!(count = posts.len(), "Seeded posts");
                posts
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading posts, falling back to seed data");
                self.seed.clone()
            }
        };

        *self.posts.write().await = loaded;
        self.loading.store(false, Ordering::Release);
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|p| p.author_id == author_id).await)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|p| p.category == category).await)
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|p| query.matches(p)).await)
    }

    async fn create(&self, fields: NewPost) -> Result<Post, RepoError> {
        self.ensure_loaded()?;
        let mut posts = self.posts.write().await;

        let id = next_unused(self.ids.as_ref(), posts.iter().map(|p| p.id.as_str()));
        let post = Post::new(id, Utc::now().date_naive(), fields);

        let mut next = Vec::with_capacity(posts.len() + 1);
        next.push(post.clone());
        next.extend(posts.iter().cloned());

        self.persist(&next).await?;
        *posts = next;

        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Created post");
        Ok(post)
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        self.ensure_loaded()?;
        let mut posts = self.posts.write().await;

        let Some(index) = posts.iter().position(|p| p.id == id) else {
            tracing::debug!(post_id = %id, "Update of unknown post ignored");
            return Ok(None);
        };

        let mut updated = posts[index].clone();
        updated.apply(patch);

        let mut next = posts.clone();
        next[index] = updated.clone();

        self.persist(&next).await?;
        *posts = next;

        tracing::info!(post_id = %id, "Updated post");
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        self.ensure_loaded()?;
        let mut posts = self.posts.write().await;

        if !posts.iter().any(|p| p.id == id) {
            tracing::debug!(post_id = %id, "Delete of unknown post ignored");
            return Ok(false);
        }

        let next: Vec<Post> = posts.iter().filter(|p| p.id != id).cloned().collect();

        self.persist(&next).await?;
        *posts = next;

        tracing::info!(post_id = %id, "Deleted post");
        Ok(true)
    }
}
