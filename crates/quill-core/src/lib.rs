//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Posts, accounts and sessions plus the ports (storage, repositories,
//! password and id services) that infrastructure implements.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{AuthError, RepoError, StorageError};
