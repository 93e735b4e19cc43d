//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use quill_infra::{AuthConfig, PostRepositoryConfig};

/// Where the key-value entries live.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Process memory, optionally capped like browser local storage.
    Memory { quota_bytes: Option<usize> },
    /// One JSON file per key under a directory.
    File { path: PathBuf },
    /// Redis server configured through `REDIS_*` variables.
    #[cfg(feature = "redis")]
    Redis,
}

/// How account passwords are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    Plaintext,
    #[cfg(feature = "hashing")]
    Argon2,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Directory holding `posts.json` and `accounts.json`; bundled fixtures otherwise.
    pub seed_dir: Option<PathBuf>,
    pub password_scheme: PasswordScheme,
    pub posts: PostRepositoryConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            storage: Self::parse_storage(),
            seed_dir: env::var("SEED_DIR").ok().map(PathBuf::from),
            password_scheme: Self::parse_password_scheme(),
            posts: PostRepositoryConfig::from_env(),
            auth: AuthConfig::from_env(),
        }
    }

    /// STORAGE_BACKEND=memory|file|redis (default memory).
    fn parse_storage() -> StorageBackend {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string());

        match backend.to_lowercase().as_str() {
            "file" => StorageBackend::File {
                path: env::var("STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data")),
            },
            #[cfg(feature = "redis")]
            "redis" => StorageBackend::Redis,
            "memory" => StorageBackend::Memory {
                quota_bytes: Self::parse_quota(),
            },
            other => {
                tracing::warn!(backend = %other, "Unknown STORAGE_BACKEND, using memory");
                StorageBackend::Memory {
                    quota_bytes: Self::parse_quota(),
                }
            }
        }
    }

    fn parse_quota() -> Option<usize> {
        env::var("STORAGE_QUOTA_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
    }

    /// PASSWORD_SCHEME=plaintext|argon2 (default plaintext).
    fn parse_password_scheme() -> PasswordScheme {
        match env::var("PASSWORD_SCHEME").as_deref() {
            #[cfg(feature = "hashing")]
            Ok("argon2") => PasswordScheme::Argon2,
            Ok("plaintext") | Err(_) => PasswordScheme::Plaintext,
            Ok(other) => {
                tracing::warn!(scheme = %other, "Unsupported PASSWORD_SCHEME, using plaintext");
                PasswordScheme::Plaintext
            }
        }
    }
}
