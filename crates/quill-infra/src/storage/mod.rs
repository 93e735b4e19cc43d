//! Key-value store implementations - in-memory, file directory and Redis.

mod file;
mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use file::FileKvStore;
pub use memory::InMemoryKvStore;

#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisKvStore};
