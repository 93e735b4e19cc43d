//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! key-value stores, the post and account repositories, and the
//! credential store.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory and file storage only
//! - `hashing` - Argon2 password hashing
//! - `redis` - Redis-backed key-value store

pub mod auth;
pub mod id;
pub mod repository;
pub mod seed;
pub mod storage;

// Re-exports
pub use auth::{AuthConfig, CredentialStore, PlaintextPasswordService};
pub use id::{SequentialIdGenerator, UuidIdGenerator};
pub use repository::{PostRepositoryConfig, StoredAccountRepository, StoredPostRepository};
pub use seed::SeedData;
pub use storage::{FileKvStore, InMemoryKvStore};

#[cfg(feature = "hashing")]
pub use auth::Argon2PasswordService;

#[cfg(feature = "redis")]
pub use storage::{RedisConfig, RedisKvStore};
