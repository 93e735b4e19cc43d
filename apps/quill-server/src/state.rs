//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{IdGenerator, KeyValueStore, PasswordService, PostRepository};
use quill_infra::{
    CredentialStore, FileKvStore, InMemoryKvStore, PlaintextPasswordService, SeedData,
    StoredAccountRepository, StoredPostRepository, UuidIdGenerator,
};

use crate::config::{AppConfig, PasswordScheme, StorageBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub credentials: Arc<CredentialStore>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let store = open_store(&config.storage).await;
        let seed = load_seed(config).await;
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);

        let passwords: Arc<dyn PasswordService> = match config.password_scheme {
            PasswordScheme::Plaintext => Arc::new(PlaintextPasswordService),
            #[cfg(feature = "hashing")]
            PasswordScheme::Argon2 => Arc::new(quill_infra::Argon2PasswordService::new()),
        };

        let posts = Arc::new(StoredPostRepository::new(
            store.clone(),
            ids.clone(),
            seed.posts,
            config.posts.clone(),
        ));

        let accounts = Arc::new(StoredAccountRepository::new(store.clone(), seed.accounts));
        let credentials = Arc::new(CredentialStore::new(
            accounts,
            store,
            passwords,
            ids,
            config.auth.clone(),
        ));

        tracing::info!("Application state initialized");

        Self { posts, credentials }
    }

    /// State over an explicit store and seed, with no load delay.
    #[cfg(test)]
    pub fn for_tests(store: Arc<dyn KeyValueStore>, seed: SeedData) -> Self {
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
        let posts = Arc::new(StoredPostRepository::new(
            store.clone(),
            ids.clone(),
            seed.posts,
            quill_infra::PostRepositoryConfig {
                load_delay: std::time::Duration::ZERO,
            },
        ));
        let accounts = Arc::new(StoredAccountRepository::new(store.clone(), seed.accounts));
        let credentials = Arc::new(CredentialStore::new(
            accounts,
            store,
            Arc::new(PlaintextPasswordService),
            ids,
            quill_infra::AuthConfig::default(),
        ));

        Self { posts, credentials }
    }
}

/// Open the configured store, falling back to memory when it is unreachable.
async fn open_store(backend: &StorageBackend) -> Arc<dyn KeyValueStore> {
    match backend {
        StorageBackend::Memory { quota_bytes } => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            match quota_bytes {
                Some(quota) => Arc::new(InMemoryKvStore::with_quota(*quota)),
                None => Arc::new(InMemoryKvStore::new()),
            }
        }
        StorageBackend::File { path } => match FileKvStore::open(path.clone()).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("Failed to open file storage: {}. Using in-memory fallback.", e);
                Arc::new(InMemoryKvStore::new())
            }
        },
        #[cfg(feature = "redis")]
        StorageBackend::Redis => match quill_infra::RedisKvStore::from_env().await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("Failed to connect to Redis: {}. Using in-memory fallback.", e);
                Arc::new(InMemoryKvStore::new())
            }
        },
    }
}

async fn load_seed(config: &AppConfig) -> SeedData {
    if let Some(dir) = &config.seed_dir {
        match SeedData::from_dir(dir).await {
            Ok(seed) => return seed,
            Err(e) => tracing::error!("Failed to read seed data: {}. Using bundled fixtures.", e),
        }
    }

    SeedData::bundled().unwrap_or_else(|e| {
        tracing::error!("Bundled seed data is invalid: {}. Starting empty.", e);
        SeedData::empty()
    })
}
