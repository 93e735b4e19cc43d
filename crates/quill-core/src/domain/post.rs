use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::Session;

/// Categories offered when composing a post.
///
/// Storage does not enforce this list; a post may carry any category string.
pub const CATEGORIES: [&str; 4] = ["React", "TypeScript", "CSS", "JavaScript"];

/// Category filter value that matches every post.
pub const ALL_CATEGORIES: &str = "All";

/// Post entity - a single authored blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    pub created_at: NaiveDate,
    pub category: String,
    pub excerpt: String,
    /// Inline data URI (`data:image/png;base64,...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Post {
    /// Build a post from its fields plus an assigned id and creation date.
    pub fn new(id: String, created_at: NaiveDate, fields: NewPost) -> Self {
        Self {
            id,
            title: fields.title,
            content: fields.content,
            author: fields.author,
            author_id: fields.author_id,
            created_at,
            category: fields.category,
            excerpt: fields.excerpt,
            image: fields.image,
        }
    }

    /// Content split into paragraphs on newline markers.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Shallow merge: every field present in the patch replaces ours.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(author_id) = patch.author_id {
            self.author_id = author_id;
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    pub category: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewPost {
    /// Attribute the post to the given session.
    pub fn authored_by(mut self, session: &Session) -> Self {
        self.author = session.name.clone();
        self.author_id = session.id.clone();
        self
    }
}

/// Partial update. The identifier is not patchable.
///
/// `image` distinguishes an absent field (keep) from `null` (clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub author_id: Option<String>,
    pub created_at: Option<NaiveDate>,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
}

/// Maps a present field to `Some`, keeping `null` as `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Listing filter: category plus case-insensitive text match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostQuery {
    pub category: Option<String>,
    pub text: Option<String>,
}

impl PostQuery {
    pub fn matches(&self, post: &Post) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) => true,
            Some(category) => post.category == category,
        };

        let text_ok = match self.text.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term)
                    || post.content.to_lowercase().contains(&term)
            }
        };

        category_ok && text_ok
    }
}
