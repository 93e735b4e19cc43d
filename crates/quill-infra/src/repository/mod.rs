//! Repositories persisted through a [`KeyValueStore`].
//!
//! [`KeyValueStore`]: quill_core::ports::KeyValueStore

mod accounts;
mod posts;

pub use accounts::StoredAccountRepository;
pub use posts::{PostRepositoryConfig, StoredPostRepository};

#[cfg(test)]
mod tests;
