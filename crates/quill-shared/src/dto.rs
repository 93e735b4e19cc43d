//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

use quill_core::domain::{CATEGORIES, NewPost, PostQuery, Session};

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated identity as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            name: session.name,
            email: session.email,
            bio: session.bio,
            avatar: session.avatar,
        }
    }
}

/// Request to create a post. Author fields come from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub excerpt: String,
    /// Data URI; an empty string means no image.
    #[serde(default)]
    pub image: Option<String>,
}

fn default_category() -> String {
    CATEGORIES[0].to_string()
}

impl CreatePostRequest {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("content", &self.content),
            ("excerpt", &self.excerpt),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Convert into post fields, attributed to no one yet.
    pub fn into_new_post(self) -> NewPost {
        NewPost {
            title: self.title,
            content: self.content,
            author: String::new(),
            author_id: String::new(),
            category: self.category,
            excerpt: self.excerpt,
            image: self.image.filter(|i| !i.is_empty()),
        }
    }
}

/// Query string of the post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListParams {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl From<PostListParams> for PostQuery {
    fn from(params: PostListParams) -> Self {
        Self {
            category: params.category,
            text: params.q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_and_blank_fields() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"T","content":" ","excerpt":"","image":""}"#)
                .unwrap();

        assert_eq!(req.category, "React");
        assert_eq!(req.missing_fields(), vec!["content", "excerpt"]);
        assert_eq!(req.into_new_post().image, None);
    }
}
