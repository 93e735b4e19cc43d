//! Domain entities - the core business objects.

mod account;
mod post;

pub use account::{Account, Session, avatar_url};
pub use post::{ALL_CATEGORIES, CATEGORIES, NewPost, Post, PostPatch, PostQuery};
