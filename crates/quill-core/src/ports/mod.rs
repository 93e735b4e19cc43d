//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod id;
mod repository;
mod storage;

pub use auth::PasswordService;
pub use id::IdGenerator;
pub use repository::{AccountRepository, PostRepository};
pub use storage::{KeyValueStore, keys};
